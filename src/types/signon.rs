//! Sign-on types for the OFX statement reader
//!
//! Every OFX response starts with a sign-on block (`SONRS`) that reports the
//! server status independently of the account type.

use chrono::{DateTime, FixedOffset};

/// Sign-on response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOn {
    /// Status code (`STATUS/CODE`); 0 means success
    pub status_code: u32,

    /// Status severity (`STATUS/SEVERITY`): INFO, WARN or ERROR
    pub severity: String,

    /// Optional server message (`STATUS/MESSAGE`)
    pub status_message: Option<String>,

    /// Server date and time (`DTSERVER`)
    pub server_time: DateTime<FixedOffset>,

    /// Language of the response (`LANGUAGE`), e.g. ENG
    pub language: String,

    /// Financial institution identifiers (`FI`)
    pub institution: Option<Institution>,
}

/// Financial institution identifiers (`FI/ORG`, `FI/FID`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    pub organization: String,
    pub fid: Option<String>,
}
