mod apply;
mod collect;
mod config;
mod error;
mod exif_reader;
mod metadata;
mod planner;
mod sanitize;
#[cfg(test)]
mod test_support;

pub use apply::{
    apply_plan, apply_plan_with, ApplyOptions, ApplyResult, FileSystem, RealFileSystem,
};
pub use collect::{
    collect_inputs, read_capture_dates, CollectOptions, CollectStats, CollectedInputs, DateScan,
};
pub use config::{app_paths, load_config, AppConfig, AppPaths};
pub use error::{MetadataError, PlanError};
pub use exif_reader::extract_capture_date;
pub use metadata::FileDateEntry;
pub use planner::{
    generate_plan, plan_renames, NamingMode, PlanOptions, RenameEntry, RenamePlan, RenamePlanIter,
    RenameStats, DATE_NAME_FORMAT, DEFAULT_PREFIX, DEFAULT_START_INDEX,
};
