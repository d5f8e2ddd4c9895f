use kube::api::GroupVersionKind;

/// Resource kinds that get special collection treatment. Everything else is
/// collected as a plain manifest write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    Pod,
    ProjectRequest,
    VirtualMachine,
    DataVolume,
    Plain,
}

impl SpecialKind {
    pub fn of(kind: &str) -> SpecialKind {
        match kind {
            "Pod" => SpecialKind::Pod,
            "ProjectRequest" => SpecialKind::ProjectRequest,
            "VirtualMachine" => SpecialKind::VirtualMachine,
            "DataVolume" => SpecialKind::DataVolume,
            _ => SpecialKind::Plain,
        }
    }
}

/// A resource type descriptor: what to ask the API server for and whether the
/// kind is namespace-scoped.
#[derive(Debug, Clone, PartialEq)]
pub struct KindSpec {
    pub gvk: GroupVersionKind,
    pub namespaced: bool,
}

// (kind, group, version, namespaced) for kinds we can resolve by bare name.
const KNOWN_KINDS: &[(&str, &str, &str, bool)] = &[
    ("Pod", "", "v1", true),
    ("Service", "", "v1", true),
    ("ConfigMap", "", "v1", true),
    ("Secret", "", "v1", true),
    ("Event", "", "v1", true),
    ("ServiceAccount", "", "v1", true),
    ("PersistentVolumeClaim", "", "v1", true),
    ("PersistentVolume", "", "v1", false),
    ("Namespace", "", "v1", false),
    ("Node", "", "v1", false),
    ("Deployment", "apps", "v1", true),
    ("DaemonSet", "apps", "v1", true),
    ("StatefulSet", "apps", "v1", true),
    ("ReplicaSet", "apps", "v1", true),
    ("Job", "batch", "v1", true),
    ("CronJob", "batch", "v1", true),
    ("ProjectRequest", "project.openshift.io", "v1", false),
    ("VirtualMachine", "kubevirt.io", "v1", true),
    ("VirtualMachineInstance", "kubevirt.io", "v1", true),
    ("DataVolume", "cdi.kubevirt.io", "v1beta1", true),
];

impl KindSpec {
    pub fn new(group: &str, version: &str, kind: &str, namespaced: bool) -> KindSpec {
        KindSpec {
            gvk: GroupVersionKind::gvk(group, version, kind),
            namespaced,
        }
    }

    pub fn kind(&self) -> &str {
        &self.gvk.kind
    }

    /// Resolve a kind descriptor from `Kind`, `version/Kind` or
    /// `group/version/Kind`. Bare kinds must be in the known table; the full
    /// forms default to namespace-scoped unless the table says otherwise.
    pub fn parse(s: &str) -> anyhow::Result<KindSpec> {
        let parts: Vec<&str> = s.split('/').collect();
        match *parts.as_slice() {
            [kind] => KindSpec::from_known(kind).ok_or_else(|| {
                anyhow::anyhow!("Unknown resource kind '{}', use group/version/Kind", kind)
            }),
            [version, kind] => Ok(KindSpec::new("", version, kind, Self::scope_of(kind))),
            [group, version, kind] => {
                Ok(KindSpec::new(group, version, kind, Self::scope_of(kind)))
            }
            _ => anyhow::bail!("Invalid resource kind '{}'", s),
        }
    }

    pub fn from_known(kind: &str) -> Option<KindSpec> {
        KNOWN_KINDS
            .iter()
            .find(|(k, ..)| *k == kind)
            .map(|(k, g, v, ns)| KindSpec::new(g, v, k, *ns))
    }

    fn scope_of(kind: &str) -> bool {
        KNOWN_KINDS
            .iter()
            .find(|(k, ..)| *k == kind)
            .map(|(.., ns)| *ns)
            .unwrap_or(true)
    }

    pub fn namespace() -> KindSpec {
        KindSpec::new("", "v1", "Namespace", false)
    }

    pub fn virtual_machine_instance() -> KindSpec {
        KindSpec::new("kubevirt.io", "v1", "VirtualMachineInstance", true)
    }
}

/// A single cluster object to collect.
#[derive(Debug, Clone)]
pub struct ResourceRef {
    pub spec: KindSpec,
    pub name: String,
    pub namespace: Option<String>,
}

impl ResourceRef {
    pub fn new(spec: KindSpec, name: impl Into<String>, namespace: Option<String>) -> ResourceRef {
        ResourceRef {
            spec,
            name: name.into(),
            namespace,
        }
    }

    pub fn kind(&self) -> &str {
        self.spec.kind()
    }

    /// Parse a `kind/name` spec (kind may itself be `group/version/Kind`).
    pub fn parse(s: &str, namespace: Option<&str>) -> anyhow::Result<ResourceRef> {
        let (kind, name) = s
            .rsplit_once('/')
            .ok_or_else(|| anyhow::anyhow!("Expected kind/name, got '{}'", s))?;
        if name.is_empty() {
            anyhow::bail!("Expected kind/name, got '{}'", s);
        }
        let spec = KindSpec::parse(kind)?;
        Ok(ResourceRef::new(spec, name, namespace.map(String::from)))
    }
}
