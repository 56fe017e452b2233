pub mod telemetry;

mod compile;
mod parse;
mod router;
pub mod strategy;
mod types;

pub use compile::{compile_query, compile_query_single, poly_string};
pub use parse::{parse_filter_list, parse_filter_list_detailed};
pub use router::{category_values, route_filters};
pub use types::{
    CompiledQuery, FilterTag, ParseConfidence, ParsedFilters, QueryKind, RawInput,
};
