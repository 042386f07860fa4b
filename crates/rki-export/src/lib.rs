//! # rki-export
//!
//! Serializes an immutable [`Snapshot`](rki_lexicon::store::Snapshot) of the
//! lexicon into its downstream representations:
//!
//! - [`json`]: the canonical `{metadata, lexicon}` document, full fidelity.
//! - [`tabular`]: TSV, one row per (entry, sense) pair.
//! - [`markup`]: XML, one `<entry>` element per entry.
//! - [`relational`]: an SQL script over `entries`, `senses`, `synonyms`, and
//!   `etymology` tables.
//!
//! Every writer collects all per-entry failures before returning, and no
//! artifact is produced for a format with any failure.

pub mod error;
pub mod exporter;
pub mod format;
pub mod json;
pub mod markup;
pub mod relational;
pub mod tabular;

pub use error::{ExportError, ExportFailure};
pub use exporter::{Artifact, Exporter};
pub use format::ExportFormat;
