//! Result extractors built on the traversal protocol.
//!
//! Every extractor observes the tree only through listener entry/exit
//! actions; the aggregate ones share the bottom-up propagation combinator
//! from [`crate::traverse::propagate`].
//!
//! - [`labels`] - distinct edge label set
//! - [`frequency`] - path label → frequency
//! - [`stats`] - per-node structured statistics
//! - [`dump`] - streaming JSON/XML tree dumps

pub mod dump;
pub mod frequency;
pub mod labels;
pub mod stats;

pub use dump::{dump_json, dump_json_string, dump_xml, frequencies_from_dump, read_dump, DumpNode};
pub use frequency::{label_frequencies, FrequencyCollector};
pub use labels::{collect_labels, LabelSetCollector};
pub use stats::{collect_stats, LabelStats, StatsCollector};
