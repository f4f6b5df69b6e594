//! Central constants for the ninjacat application

/// Default values for configuration
pub mod config {
    /// Default configuration file name
    pub const DEFAULT_CONFIG_FILE: &str = "ninjacat.yaml";

    /// Environment variables that override configuration file values
    pub mod env {
        pub const CLIENT_ID: &str = "NINJACAT_CLIENT_ID";
        pub const CLIENT_SECRET: &str = "NINJACAT_CLIENT_SECRET";
        pub const AGENCY_ID: &str = "NINJACAT_AGENCY_ID";
        pub const AGENCY_IDENTIFIER: &str = "NINJACAT_AGENCY_IDENTIFIER";
        pub const REPORT_SECRET: &str = "NINJACAT_REPORT_SECRET";
        pub const API_URL: &str = "NINJACAT_API_URL";
        pub const REPORT_URL: &str = "NINJACAT_REPORT_URL";
    }
}

/// Default values for report polling from the command line
pub mod report {
    /// Seconds between polls when waiting for a report
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

    /// Polls before giving up on a report
    pub const DEFAULT_MAX_POLLS: u32 = 120;

    /// Date format accepted for report windows
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Default log filters
pub mod logging {
    /// Filter used when RUST_LOG is not set
    pub const DEFAULT_FILTER: &str = "warn";

    /// Filter used with --verbose
    pub const VERBOSE_FILTER: &str = "warn,ninjacat=debug,ninjacat_client=debug";
}
