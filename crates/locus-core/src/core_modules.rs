//! Builtin (core) module registry.

/// Node builtin module names.
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Scheme prefix that always denotes a builtin.
const NODE_SCHEME: &str = "node:";

/// Static set of names provided by the host platform.
#[derive(Debug, Clone, Copy)]
pub struct CoreModuleRegistry {
    names: &'static [&'static str],
}

impl CoreModuleRegistry {
    /// Registry backed by a host-supplied table.
    #[must_use]
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    /// Registry of Node builtins.
    #[must_use]
    pub const fn node() -> Self {
        Self::new(NODE_BUILTINS)
    }

    /// Check whether `name` is a builtin. A `node:` prefix is accepted.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let name = name.strip_prefix(NODE_SCHEME).unwrap_or(name);
        self.names.contains(&name)
    }

    /// All names in the table.
    #[must_use]
    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }
}

impl Default for CoreModuleRegistry {
    fn default() -> Self {
        Self::node()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builtins() {
        let registry = CoreModuleRegistry::node();
        assert!(registry.contains("assert"));
        assert!(registry.contains("fs/promises"));
        assert!(registry.contains("node:path"));
        assert!(!registry.contains("not-a-core-module"));
        assert!(!registry.contains("./fs"));
    }

    #[test]
    fn test_custom_table() {
        static NAMES: &[&str] = &["std", "io"];
        let registry = CoreModuleRegistry::new(NAMES);
        assert!(registry.contains("io"));
        assert!(!registry.contains("fs"));
        assert_eq!(registry.names().len(), 2);
    }
}
