#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod core_modules;
pub mod error;
pub mod module_map;
pub mod paths;
pub mod resolver;
pub mod version;

pub use config::{Config, MapperEntry, ResolverConfig};
pub use core_modules::CoreModuleRegistry;
pub use error::{BoxError, Error, Result};
pub use module_map::{EmptyModuleMap, InMemoryModuleMap, ModuleMap};
pub use paths::{PathOps, PathStyle};
pub use resolver::{
    ExternalResolver, ExternalResolverOptions, FindNodeModuleOptions, NameMapper, Resolution,
    ResolutionRequest, Resolver, ResolverOptions,
};
