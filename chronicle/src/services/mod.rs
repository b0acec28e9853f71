mod context;
mod executors;
mod merger;
mod query;
mod vector_search;

pub use context::{describe_exact, ContextAssembler, NO_MATCHING_DATA};
pub use executors::{
    aggregate_metric, bucket_pattern, DirectQueryExecutor, DirectQueryResult, QueryScope,
    WEEKDAY_NAMES,
};
pub use merger::{merge_records, DualDateQueryMerger};
pub use query::QueryEngine;
pub use vector_search::VectorSearch;
