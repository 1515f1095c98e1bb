//! Module resolver.
//!
//! Maps a specifier imported from a file to the file (or mock) backing it,
//! under either the POSIX or the Windows path convention.

mod external;
pub mod mapper;
pub mod node_path;
mod options;
pub mod package_json;
pub mod probe;
mod resolve;
pub mod search_paths;

pub use external::{ExternalResolver, ExternalResolverOptions};
pub use mapper::{MappedName, MappingRule, NameMapper};
pub use node_path::NODE_PATH_ENV;
pub use options::{ResolverOptions, DEFAULT_EXTENSIONS, DEFAULT_MODULE_DIRECTORY};
pub use probe::{CandidateProbe, Tried, MAX_TRIED_PATHS};
pub use resolve::{
    FindNodeModuleOptions, LookupEnv, Resolution, ResolutionRequest, Resolver,
};
pub use search_paths::build_search_paths;
