/// Constants used by run configuration defaults.
pub mod config {
    /// Default minimum number of messages a partner needs to be analyzed.
    pub const DEFAULT_THRESHOLD: usize = 500;
    /// Default number of unigrams and bigrams reported per partner.
    pub const DEFAULT_TOP_N: usize = 8;
    /// Default RNG seed for resampling.
    pub const DEFAULT_SEED: u64 = 0;
}

/// Constants used when turning raw archive entries into records.
pub mod store {
    /// Number of trailing digits kept from phone-style addresses.
    pub const PARTNER_ID_DIGITS: usize = 10;
    /// Direction code the archive uses for received messages.
    pub const RECEIVED_TYPE_CODE: &str = "1";
    /// Placeholder some backup tools write for contacts without a name.
    pub const UNKNOWN_CONTACT_NAME: &str = "(Unknown)";
    /// Field name reported when an entry without an address is skipped.
    pub const FIELD_ADDRESS: &str = "address";
    /// Field name reported when an entry without a body is skipped.
    pub const FIELD_BODY: &str = "body";
}

/// Constants used by archive readers.
pub mod source {
    /// Source id used by in-memory archives.
    pub const MEMORY_SOURCE_ID: &str = "memory";
    /// File extensions recognised as XML backups.
    pub const XML_EXTENSIONS: &[&str] = &["xml"];
    /// File extensions recognised as JSON-lines archives.
    pub const JSONL_EXTENSIONS: &[&str] = &["jsonl", "ndjson"];
}

/// Constants used by the weighting strategies.
pub mod weighting {
    /// Minimum document frequency for analytical terms.
    pub const ANALYTICAL_MIN_DF: usize = 2;
    /// Largest n-gram length produced by the analytical strategy.
    pub const ANALYTICAL_MAX_NGRAM: usize = 2;
    /// Minimum number of word characters in a token.
    pub const MIN_TOKEN_CHARS: usize = 2;
    /// Separator joining the words of a multi-word term.
    pub const NGRAM_SEPARATOR: &str = " ";
}

/// Constants used by the classifier.
pub mod classifier {
    /// Additive (Laplace) smoothing applied to per-class term weights.
    pub const LAPLACE_ALPHA: f64 = 1.0;
}

/// Constants used by the interactive query loop.
pub mod query {
    /// Line that ends a query session.
    pub const QUIT_COMMAND: &str = "quit";
    /// Prompt written before each read.
    pub const PROMPT: &str = "Please enter some text for me to guess, or type quit: ";
    /// Prefix written before each prediction.
    pub const PREDICTION_PREFIX: &str = "This sounds most like: ";
    /// Line written when the session ends.
    pub const FAREWELL: &str = "Thanks for playing!";
}

/// Constants used by text reports.
pub mod report {
    /// Width (in characters) of the longest bar in the partner chart.
    pub const CHART_WIDTH: usize = 40;
    /// Horizontal rule separating report sections.
    pub const SECTION_RULE: &str =
        "------------------------------------------------------------------";
}
