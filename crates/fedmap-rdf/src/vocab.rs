//! Predicate and datatype IRIs used by the mapping layer.
//!
//! Only the terms the mapping layer reads or writes are listed here.

/// Fedora repository vocabulary.
pub mod fcrepo {
    pub const NS: &str = "http://fedora.info/definitions/v4/repository#";

    pub const HAS_CONTENT: &str = "http://fedora.info/definitions/v4/repository#hasContent";
    pub const MIME_TYPE: &str = "http://fedora.info/definitions/v4/repository#mimeType";
    pub const CREATED: &str = "http://fedora.info/definitions/v4/repository#created";
    pub const LAST_MODIFIED: &str = "http://fedora.info/definitions/v4/repository#lastModified";
    pub const HAS_CHILD: &str = "http://fedora.info/definitions/v4/repository#hasChild";
    /// Fixity result predicate used by repositories before 4.4.0.
    pub const STATUS: &str = "http://fedora.info/definitions/v4/repository#status";
}

/// Fedora model vocabulary; `hasModel` names the record type of a resource.
pub mod model {
    pub const HAS_MODEL: &str = "info:fedora/fedora-system:def/model#hasModel";
}

/// PREMIS preservation vocabulary.
pub mod premis {
    /// Fixity result predicate used by repositories from 4.4.0 on.
    pub const HAS_EVENT_OUTCOME: &str = "http://www.loc.gov/premis/rdf/v1#hasEventOutcome";
    pub const HAS_MESSAGE_DIGEST: &str = "http://www.loc.gov/premis/rdf/v1#hasMessageDigest";
    pub const HAS_SIZE: &str = "http://www.loc.gov/premis/rdf/v1#hasSize";
}

/// Linked Data Platform vocabulary.
pub mod ldp {
    pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
}

/// Dublin Core elements.
pub mod dc {
    pub const TITLE: &str = "http://purl.org/dc/elements/1.1/title";
    pub const CREATOR: &str = "http://purl.org/dc/elements/1.1/creator";
    pub const SUBJECT: &str = "http://purl.org/dc/elements/1.1/subject";
}

/// XML Schema datatypes.
pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
}
