use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kube-data-collector")]
#[command(about = "Collect cluster resource manifests and pod logs into a directory tree")]
pub struct Cli {
    /// Resources to collect, as kind/name (e.g. VirtualMachine/vm1, Pod/my-pod)
    pub resources: Vec<String>,

    /// Comma-separated resource kinds to bulk-collect (e.g. Pod,Deployment,DataVolume)
    #[arg(short = 'k', long)]
    pub kinds: Option<String>,

    /// Namespace
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Output directory (overrides collector configuration)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Skip container log collection
    #[arg(long)]
    pub no_logs: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
