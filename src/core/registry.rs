use std::collections::HashMap;

/// Path segment that stands for "append a fresh entry here" rather than a
/// named child. Entry segments are never stored in the reference cache, so
/// every occurrence of the owning flag appends a new element.
pub const ENTRY_SEGMENT: &str = "$entry";

/// How a flag's value maps onto the compose document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Single string value, e.g. `--name` -> `container_name`.
    Scalar,
    /// `key=value` pairs accumulated into a mapping, e.g. `--env`.
    Map,
    /// Values accumulated into a sequence, e.g. `--publish`.
    List,
    /// The combined `name=soft:hard` resource-limit value.
    Ulimit,
    /// Present/absent flag, normalized to a `"true"`/`"false"` scalar.
    Bool,
}

/// Static metadata for one canonical `docker run` flag.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub kind: FlagKind,
    /// Dot-separated destination relative to the service mapping. An empty
    /// path means the flag is recognized but only affects runtime behavior,
    /// so it produces no manifest output (`--detach`, `--rm`).
    pub path: &'static str,
}

/// Canonical flags: name, kind, destination path.
const FLAGS: &[(&str, FlagKind, &str)] = &[
    // scalar-valued
    ("name", FlagKind::Scalar, "container_name"),
    ("hostname", FlagKind::Scalar, "hostname"),
    ("user", FlagKind::Scalar, "user"),
    ("workdir", FlagKind::Scalar, "working_dir"),
    ("restart", FlagKind::Scalar, "restart"),
    ("entrypoint", FlagKind::Scalar, "entrypoint"),
    ("network", FlagKind::Scalar, "network_mode"),
    ("pid", FlagKind::Scalar, "pid"),
    ("ipc", FlagKind::Scalar, "ipc"),
    ("platform", FlagKind::Scalar, "platform"),
    ("runtime", FlagKind::Scalar, "runtime"),
    ("memory", FlagKind::Scalar, "mem_limit"),
    ("memory-reservation", FlagKind::Scalar, "mem_reservation"),
    ("shm-size", FlagKind::Scalar, "shm_size"),
    ("stop-signal", FlagKind::Scalar, "stop_signal"),
    ("stop-timeout", FlagKind::Scalar, "stop_grace_period"),
    ("cpus", FlagKind::Scalar, "cpus"),
    ("cpu-shares", FlagKind::Scalar, "cpu_shares"),
    ("cgroup-parent", FlagKind::Scalar, "cgroup_parent"),
    ("mac-address", FlagKind::Scalar, "mac_address"),
    ("domainname", FlagKind::Scalar, "domainname"),
    ("log-driver", FlagKind::Scalar, "logging.driver"),
    // boolean
    ("detach", FlagKind::Bool, ""),
    ("rm", FlagKind::Bool, ""),
    ("interactive", FlagKind::Bool, "stdin_open"),
    ("tty", FlagKind::Bool, "tty"),
    ("privileged", FlagKind::Bool, "privileged"),
    ("read-only", FlagKind::Bool, "read_only"),
    ("init", FlagKind::Bool, "init"),
    ("oom-kill-disable", FlagKind::Bool, "oom_kill_disable"),
    // list-accumulating
    ("publish", FlagKind::List, "ports.$entry"),
    ("volume", FlagKind::List, "volumes.$entry"),
    ("expose", FlagKind::List, "expose.$entry"),
    ("dns", FlagKind::List, "dns.$entry"),
    ("dns-search", FlagKind::List, "dns_search.$entry"),
    ("cap-add", FlagKind::List, "cap_add.$entry"),
    ("cap-drop", FlagKind::List, "cap_drop.$entry"),
    ("device", FlagKind::List, "devices.$entry"),
    ("env-file", FlagKind::List, "env_file.$entry"),
    ("security-opt", FlagKind::List, "security_opt.$entry"),
    ("add-host", FlagKind::List, "extra_hosts.$entry"),
    ("link", FlagKind::List, "links.$entry"),
    ("tmpfs", FlagKind::List, "tmpfs.$entry"),
    ("group-add", FlagKind::List, "group_add.$entry"),
    ("volumes-from", FlagKind::List, "volumes_from.$entry"),
    // map-accumulating
    ("env", FlagKind::Map, "environment.$entry"),
    ("label", FlagKind::Map, "labels.$entry"),
    ("sysctl", FlagKind::Map, "sysctls.$entry"),
    ("log-opt", FlagKind::Map, "logging.options.$entry"),
    // specialized
    ("ulimit", FlagKind::Ulimit, "ulimits.$entry"),
];

/// Short and alternate spellings resolved to canonical names.
const ALIASES: &[(&str, &str)] = &[
    ("d", "detach"),
    ("e", "env"),
    ("h", "hostname"),
    ("i", "interactive"),
    ("l", "label"),
    ("m", "memory"),
    ("p", "publish"),
    ("t", "tty"),
    ("u", "user"),
    ("v", "volume"),
    ("w", "workdir"),
    ("net", "network"),
];

/// Segments whose node kind differs from their owning flag's kind. The
/// `logging` mapping is shared by the scalar `--log-driver` flag and the
/// map-accumulating `--log-opt` flag, so it must always materialize as a
/// mapping regardless of which flag reaches it first.
const SEGMENT_KINDS: &[(&str, FlagKind)] = &[("logging", FlagKind::Map)];

/// Immutable lookup table from `docker run` flag names to their compose
/// destinations. Built once at startup and borrowed by every compiler
/// instance; never mutated afterwards.
#[derive(Debug)]
pub struct FlagRegistry {
    flags: HashMap<&'static str, FlagSpec>,
    aliases: HashMap<&'static str, &'static str>,
    segment_kinds: HashMap<&'static str, FlagKind>,
}

impl FlagRegistry {
    pub fn new() -> Self {
        let flags = FLAGS
            .iter()
            .map(|&(name, kind, path)| (name, FlagSpec { kind, path }))
            .collect();
        let aliases = ALIASES.iter().copied().collect();
        let segment_kinds = SEGMENT_KINDS.iter().copied().collect();
        Self {
            flags,
            aliases,
            segment_kinds,
        }
    }

    /// Resolve a flag name (following at most one alias hop) to its spec.
    /// Returns `None` for flags absent from the registry.
    pub fn lookup(&self, name: &str) -> Option<&FlagSpec> {
        let canonical = self.aliases.get(name).copied().unwrap_or(name);
        self.flags.get(canonical)
    }

    /// The semantic kind of a flag, if known. Used by the tokenizer to
    /// decide whether a flag takes a value.
    pub fn kind_of(&self, name: &str) -> Option<FlagKind> {
        self.lookup(name).map(|spec| spec.kind)
    }

    /// The node kind a path segment should materialize as, falling back to
    /// the owning flag's kind when the segment has no override.
    pub fn segment_kind(&self, segment: &str, fallback: FlagKind) -> FlagKind {
        self.segment_kinds.get(segment).copied().unwrap_or(fallback)
    }
}

impl Default for FlagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_resolves_to_canonical_spec() {
        let reg = FlagRegistry::new();
        let spec = reg.lookup("p").expect("-p should resolve");
        assert_eq!(spec.kind, FlagKind::List);
        assert_eq!(spec.path, "ports.$entry");
    }

    #[test]
    fn unknown_flag_is_none() {
        let reg = FlagRegistry::new();
        assert!(reg.lookup("definitely-not-a-flag").is_none());
    }

    #[test]
    fn runtime_only_flag_has_empty_path() {
        let reg = FlagRegistry::new();
        let spec = reg.lookup("detach").unwrap();
        assert_eq!(spec.kind, FlagKind::Bool);
        assert!(spec.path.is_empty());
    }

    #[test]
    fn logging_segment_overrides_scalar_flag_kind() {
        let reg = FlagRegistry::new();
        // --log-driver is scalar, but its `logging` parent must be a map.
        assert_eq!(reg.segment_kind("logging", FlagKind::Scalar), FlagKind::Map);
        assert_eq!(reg.segment_kind("ports", FlagKind::List), FlagKind::List);
    }

    #[test]
    fn bool_kind_reachable_through_alias() {
        let reg = FlagRegistry::new();
        assert_eq!(reg.kind_of("t"), Some(FlagKind::Bool));
        assert_eq!(reg.kind_of("tty"), Some(FlagKind::Bool));
        assert_eq!(reg.kind_of("nope"), None);
    }
}
