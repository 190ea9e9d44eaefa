//! Default probe table
//!
//! Order is fixed: local layout first, then host health, then the remote,
//! then capability probes of safeprune's own components.

use safeprune_config::{HealthConfig, RemoteConfig};
use safeprune_errors::Error;
use safeprune_platform::{fs, Platform, PlatformContext};
use safeprune_recovery::BackupRestorer;
use safeprune_remote::RemoteSourceControl;
use safeprune_verify::{Oracle, OracleAnswer};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::probe::{FnProbe, Probe};

/// Everything the default probes look at
pub struct ProbeEnv {
    pub work_dir: PathBuf,
    pub clone_dir: PathBuf,
    pub remote_config: RemoteConfig,
    pub health_config: HealthConfig,
    pub platform: Platform,
    pub context: PlatformContext,
    pub remote: Arc<dyn RemoteSourceControl>,
    pub oracle: Oracle,
    pub restorer: Arc<BackupRestorer>,
}

fn probe<F, Fut>(name: &str, env: &Arc<ProbeEnv>, check: F) -> Box<dyn Probe>
where
    F: Fn(Arc<ProbeEnv>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, Error>> + Send + 'static,
{
    let env = Arc::clone(env);
    Box::new(FnProbe::new(name, move || check(Arc::clone(&env))))
}

/// The standard nine probes, in order
#[must_use]
pub fn default_probes(env: &Arc<ProbeEnv>) -> Vec<Box<dyn Probe>> {
    vec![
        probe("File Structure", env, file_structure),
        probe("Rules Directory", env, rules_directory),
        probe("System Health", env, system_health),
        probe("Remote Connectivity", env, remote_connectivity),
        probe("Repository Verification", env, repository_verification),
        probe("Verification Oracle", env, verification_oracle),
        probe("Backup Sources", env, backup_sources),
        probe("Scratch Workspace", env, scratch_workspace),
        probe("Version Control Tooling", env, version_control_tooling),
    ]
}

async fn file_structure(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    if !fs::is_dir(&env.work_dir).await {
        return Ok(false);
    }
    for file in &env.health_config.essential_files {
        if !fs::exists(&env.work_dir.join(file)).await {
            tracing::warn!(file = %file, "essential file missing");
            return Ok(false);
        }
    }
    Ok(true)
}

async fn rules_directory(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    Ok(fs::dir_non_empty(&env.work_dir.join(&env.health_config.rules_dir)).await)
}

async fn system_health(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    let mut df = env.platform.command("df");
    df.arg("-h")
        .arg(env.work_dir.to_string_lossy())
        .current_dir(&env.work_dir)
        .timeout(env.remote_config.connectivity_timeout());
    if !env.platform.execute_command(&env.context, df).await?.success() {
        return Ok(false);
    }

    let mut ping = env.platform.command("ping");
    ping.args(["-c", "1", env.remote_config.host.as_str()])
        .current_dir(&env.work_dir)
        .timeout(env.remote_config.connectivity_timeout());
    Ok(env.platform.execute_command(&env.context, ping).await?.success())
}

async fn remote_connectivity(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    env.remote
        .auth_status(env.remote_config.auth_timeout())
        .await?;
    Ok(true)
}

async fn repository_verification(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    let repositories = env
        .remote
        .list_repositories(
            &env.remote_config.owner,
            env.remote_config.repository_probe_limit,
            env.remote_config.list_timeout(),
        )
        .await?;
    Ok(!repositories.is_empty())
}

async fn verification_oracle(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    let answer = env.oracle.query(&env.health_config.oracle_probe_file).await;
    if let OracleAnswer::Failed { .. } = &answer {
        tracing::warn!(reason = %answer.reason(), "oracle probe query failed");
        return Ok(false);
    }
    Ok(true)
}

async fn backup_sources(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    Ok(env.restorer.sources_usable().await)
}

async fn scratch_workspace(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    fs::create_dir_all(&env.clone_dir).await?;
    let scratch = env
        .clone_dir
        .join(format!(".safeprune-probe-{}", std::process::id()));
    fs::write(&scratch, b"probe").await?;
    fs::remove_file(&scratch).await?;
    Ok(true)
}

async fn version_control_tooling(env: Arc<ProbeEnv>) -> Result<bool, Error> {
    let mut git = env.platform.command(&env.remote_config.git_program);
    git.arg("--version").current_dir(&env.work_dir);
    Ok(env.platform.execute_command(&env.context, git).await?.success())
}
