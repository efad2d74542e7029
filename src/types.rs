/// Normalized identifier of the other party in a conversation.
/// Example: `5551234567` (last 10 digits of `+15551234567`)
pub type PartnerId = String;
/// Human label shown for a partner.
/// Examples: `Jane Doe`, `+15551234567`
pub type DisplayName = String;
/// Opaque, human-readable timestamp copied from the archive.
/// Example: `Jan 20, 2020 4:12:09 PM`
pub type ReadableDate = String;
/// Raw direction code as read from the archive.
/// Examples: `1`, `2`, `-1`
pub type TypeCode = String;
/// Vocabulary entry produced by a weighting strategy (unigram or space-joined bigram).
/// Examples: `pizza`, `see you`
pub type Term = String;
/// Identifier for an archive source.
/// Examples: `texts.xml`, `memory`
pub type SourceId = String;
/// Pipeline stage label used in diagnostics.
/// Examples: `record store`, `classifier`
pub type StageName = &'static str;
