use std::path::Path;

use k8s_openapi::api::core::v1::Pod;
use kube::api::{DynamicObject, ListParams};
use kube::{Client, ResourceExt};
use tracing::{debug, info, warn};

use crate::kinds::{KindSpec, ResourceRef, SpecialKind};
use crate::kubernetes::{
    container_log, container_names, dynamic_list_api, fetch_manifest, get_pod,
    get_virtual_machine_instance, list_pods, to_yaml, virt_launcher_pod,
};
use crate::writer::{WriteMode, write_to_file};

/// Pod name prefixes identifying CDI worker pods spawned for a DataVolume.
pub const DEFAULT_CDI_POD_PREFIXES: &[&str] = &["importer", "cdi-upload"];

const CDI_SOURCE_POD_SUFFIX: &str = "source-pod";

/// Naming-convention heuristic for DataVolume worker pods: prefix or suffix
/// match, case-sensitive, literal string comparison.
pub fn is_cdi_worker_pod(pod_name: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| pod_name.starts_with(prefix))
        || pod_name.ends_with(CDI_SOURCE_POD_SUFFIX)
}

/// Collect one resource's manifest under `<directory>/<Kind>/<name>/`, plus
/// any pods the resource owns. Best-effort: every failure is logged and
/// skipped, nothing aborts the run.
pub async fn collect_resource(
    client: &Client,
    resource: &ResourceRef,
    directory: &Path,
    collect_logs: bool,
) {
    info!(
        "Collecting instance data for {} {} under {}",
        resource.kind(),
        resource.name,
        directory.display()
    );

    let resource = match SpecialKind::of(resource.kind()) {
        SpecialKind::Pod => {
            match get_pod(client, &resource.name, resource.namespace.as_deref()).await {
                Ok(pod) => collect_pods(client, &[pod], directory, collect_logs).await,
                Err(err) => warn!("Failed to collect pod {}: {}", resource.name, err),
            }
            return;
        }
        // A ProjectRequest and its Namespace are the same object as far as
        // collection goes.
        SpecialKind::ProjectRequest => {
            ResourceRef::new(KindSpec::namespace(), resource.name.clone(), None)
        }
        _ => resource.clone(),
    };

    let output_directory = directory.join(resource.kind()).join(&resource.name);

    match fetch_manifest(
        client,
        &resource.spec,
        &resource.name,
        resource.namespace.as_deref(),
    )
    .await
    {
        Ok(yaml) => write_to_file(
            &format!("{}.yaml", resource.name),
            &yaml,
            &output_directory,
            None,
            WriteMode::Truncate,
        ),
        Err(err) => warn!(
            "Failed to collect resource {} {}: {}",
            resource.kind(),
            resource.name,
            err
        ),
    }

    match SpecialKind::of(resource.kind()) {
        SpecialKind::VirtualMachine => {
            collect_vm_instance_data(client, &resource, &output_directory, collect_logs).await;
        }
        SpecialKind::DataVolume => {
            collect_data_volume_pods(client, &output_directory, collect_logs, None).await;
        }
        _ => {}
    }
}

/// Collect a VirtualMachine's running instance: the instance manifest goes
/// next to the VM's own, the virt-launcher pod under `Pod/<pod-name>/`.
async fn collect_vm_instance_data(
    client: &Client,
    vm: &ResourceRef,
    directory: &Path,
    collect_logs: bool,
) {
    let vmi = match get_virtual_machine_instance(client, &vm.name, vm.namespace.as_deref()).await {
        Ok(Some(vmi)) => vmi,
        Ok(None) => {
            debug!("VirtualMachine {} has no running instance", vm.name);
            return;
        }
        Err(err) => {
            warn!("Failed to get instance of VirtualMachine {}: {}", vm.name, err);
            return;
        }
    };

    match virt_launcher_pod(client, &vmi).await {
        Ok(Some(pod)) => collect_pods(client, &[pod], directory, collect_logs).await,
        Ok(None) => debug!("No running virt-launcher pod for {}", vm.name),
        Err(err) => warn!("Failed to find virt-launcher pod for {}: {}", vm.name, err),
    }

    match to_yaml(&vmi) {
        Ok(yaml) => write_to_file(
            &format!("{}.yaml", vmi.name_any()),
            &yaml,
            directory,
            None,
            WriteMode::Truncate,
        ),
        Err(err) => warn!("Failed to collect instance {} yaml: {}", vmi.name_any(), err),
    }
}

/// Collect CDI worker pods related to a DataVolume, matched across the whole
/// cluster by the pod-name heuristic. No matches is not an error.
pub async fn collect_data_volume_pods(
    client: &Client,
    directory: &Path,
    collect_logs: bool,
    cdi_pod_prefixes: Option<&[&str]>,
) {
    let prefixes = cdi_pod_prefixes.unwrap_or(DEFAULT_CDI_POD_PREFIXES);
    let pods = match list_pods(client, None, None).await {
        Ok(pods) => pods,
        Err(err) => {
            warn!("Failed to list pods for DataVolume collection: {}", err);
            return;
        }
    };

    let matched: Vec<Pod> = pods
        .into_iter()
        .filter(|pod| is_cdi_worker_pod(&pod.name_any(), prefixes))
        .collect();

    if !matched.is_empty() {
        collect_pods(client, &matched, directory, collect_logs).await;
    }
}

/// Write each pod's manifest to `<base_directory>/Pod/<name>/<name>.yaml` and
/// optionally its container logs. One pod's failure never aborts the others.
pub async fn collect_pods(client: &Client, pods: &[Pod], base_directory: &Path, collect_logs: bool) {
    let output_directory = base_directory.join("Pod");
    for pod in pods {
        let name = pod.name_any();
        let pod_output_dir = output_directory.join(&name);
        write_pod_manifest(pod, &pod_output_dir);
        if collect_logs {
            write_container_logs(client, pod, &pod_output_dir).await;
        }
    }
}

pub fn write_pod_manifest(pod: &Pod, pod_output_dir: &Path) {
    let name = pod.name_any();
    match to_yaml(pod) {
        Ok(yaml) => write_to_file(
            &format!("{}.yaml", name),
            &yaml,
            pod_output_dir,
            None,
            WriteMode::Truncate,
        ),
        Err(err) => warn!("Failed to collect pod {} yaml: {}", name, err),
    }
}

/// Write each container's log to `containers/<pod>_<container>.log`. A pod
/// with unreadable status skips log collection only; its manifest stands.
async fn write_container_logs(client: &Client, pod: &Pod, base_directory: &Path) {
    let name = pod.name_any();
    let Some(containers) = container_names(pod) else {
        warn!("Failed to get pod {} containers", name);
        return;
    };

    for container in containers {
        match container_log(client, pod, &container).await {
            Ok(log) => write_to_file(
                &format!("{}_{}.log", name, container),
                &log,
                base_directory,
                Some("containers"),
                WriteMode::Truncate,
            ),
            Err(err) => warn!(
                "Failed to collect pod {} container {} logs: {}",
                name, container, err
            ),
        }
    }
}

/// Collect every instance of each resource kind, flat under
/// `<base_directory>/<Kind>/<name>.yaml`. Listing one kind and writing one
/// instance are independent failure boundaries.
pub async fn collect_resource_kinds(
    client: &Client,
    kinds: &[KindSpec],
    base_directory: &Path,
    namespace: Option<&str>,
) {
    for spec in kinds {
        let api = dynamic_list_api(client.clone(), spec, namespace);
        let list = match api.list(&ListParams::default()).await {
            Ok(list) => list,
            Err(err) => {
                warn!("Failed to collect resources for type {}: {}", spec.kind(), err);
                continue;
            }
        };
        for obj in list.items {
            write_instance_manifest(&obj, spec, base_directory);
        }
    }
}

fn write_instance_manifest(obj: &DynamicObject, spec: &KindSpec, base_directory: &Path) {
    let name = obj.name_any();
    match to_yaml(obj) {
        Ok(yaml) => write_to_file(
            &format!("{}.yaml", name),
            &yaml,
            base_directory,
            Some(spec.kind()),
            WriteMode::Truncate,
        ),
        Err(err) => warn!("Failed to collect resource: {} {} {}", spec.kind(), name, err),
    }
}
