use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ApiResource, DynamicObject, ListParams, LogParams};
use kube::{Client, ResourceExt};

use crate::kinds::KindSpec;

/// Build a dynamic API handle for fetching a single object. A namespaced kind
/// with no namespace given falls back to the client's default namespace, same
/// as [`get_pod`] does for pods.
pub fn dynamic_api(client: Client, spec: &KindSpec, namespace: Option<&str>) -> Api<DynamicObject> {
    let ar = ApiResource::from_gvk(&spec.gvk);
    if !spec.namespaced {
        return Api::all_with(client, &ar);
    }
    match namespace {
        Some(ns) => Api::namespaced_with(client, ns, &ar),
        None => Api::default_namespaced_with(client, &ar),
    }
}

/// Build a dynamic API handle for listing: with no namespace given a
/// namespaced kind is listed across the whole cluster.
pub fn dynamic_list_api(
    client: Client,
    spec: &KindSpec,
    namespace: Option<&str>,
) -> Api<DynamicObject> {
    let ar = ApiResource::from_gvk(&spec.gvk);
    match namespace {
        Some(ns) if spec.namespaced => Api::namespaced_with(client, ns, &ar),
        _ => Api::all_with(client, &ar),
    }
}

pub fn to_yaml<T: serde::Serialize>(obj: &T) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(obj)?)
}

/// Fetch a resource and render its manifest as YAML.
pub async fn fetch_manifest(
    client: &Client,
    spec: &KindSpec,
    name: &str,
    namespace: Option<&str>,
) -> anyhow::Result<String> {
    let api = dynamic_api(client.clone(), spec, namespace);
    let obj = api.get(name).await?;
    to_yaml(&obj)
}

pub async fn get_pod(client: &Client, name: &str, namespace: Option<&str>) -> anyhow::Result<Pod> {
    let api: Api<Pod> = match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::default_namespaced(client.clone()),
    };
    Ok(api.get(name).await?)
}

/// List pods cluster-wide, or within a namespace, optionally filtered by a
/// label selector.
pub async fn list_pods(
    client: &Client,
    namespace: Option<&str>,
    label_selector: Option<&str>,
) -> anyhow::Result<Vec<Pod>> {
    let api: Api<Pod> = match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    };
    let mut lp = ListParams::default();
    if let Some(selector) = label_selector {
        lp = lp.labels(selector);
    }
    Ok(api.list(&lp).await?.items)
}

pub async fn container_log(client: &Client, pod: &Pod, container: &str) -> anyhow::Result<String> {
    let api: Api<Pod> = match pod.namespace() {
        Some(ns) => Api::namespaced(client.clone(), &ns),
        None => Api::default_namespaced(client.clone()),
    };
    let lp = LogParams {
        container: Some(container.to_string()),
        ..Default::default()
    };
    Ok(api.logs(&pod.name_any(), &lp).await?)
}

/// Look up the VirtualMachineInstance backing a VirtualMachine, if it exists.
/// Resolved freshly on every call, never cached.
pub async fn get_virtual_machine_instance(
    client: &Client,
    name: &str,
    namespace: Option<&str>,
) -> anyhow::Result<Option<DynamicObject>> {
    let api = dynamic_api(
        client.clone(),
        &KindSpec::virtual_machine_instance(),
        namespace,
    );
    Ok(api.get_opt(name).await?)
}

/// Find the running virt-launcher pod owning a VirtualMachineInstance.
pub async fn virt_launcher_pod(
    client: &Client,
    vmi: &DynamicObject,
) -> anyhow::Result<Option<Pod>> {
    let uid = vmi
        .metadata
        .uid
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("VirtualMachineInstance {} has no uid", vmi.name_any()))?;
    let selector = format!("kubevirt.io=virt-launcher,kubevirt.io/created-by={}", uid);
    let pods = list_pods(client, vmi.namespace().as_deref(), Some(&selector)).await?;
    Ok(pods.into_iter().find(is_running))
}

fn is_running(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .is_some_and(|phase| phase == "Running")
}

/// Container names as reported by the pod's status.
pub fn container_names(pod: &Pod) -> Option<Vec<String>> {
    let statuses = pod.status.as_ref()?.container_statuses.as_ref()?;
    Some(statuses.iter().map(|cs| cs.name.clone()).collect())
}
