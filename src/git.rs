//! Mirror clone and push through the system `git` binary.
//!
//! Tokens are injected into HTTP(S) remote URLs and scrubbed from every
//! message that leaves this module.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::{Regex, RegexSet};
use reqwest::Url;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::{Config, RefScope};
use crate::error::TransferError;

const SOURCE_USERNAME: &str = "oauth2";
const DESTINATION_USERNAME: &str = "x-access-token";

/// A local bare mirror of the source. The backing directory, when owned, is
/// removed on drop.
#[derive(Debug)]
pub struct LocalMirror {
    path: PathBuf,
    _dir: Option<TempDir>,
}

impl LocalMirror {
    /// A mirror at `path` that is left in place on drop.
    pub fn at(path: &Path) -> Self {
        LocalMirror {
            path: path.to_path_buf(),
            _dir: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
pub trait GitMirror: Send + Sync {
    async fn clone_mirror(&self, source_url: &str) -> Result<LocalMirror, TransferError>;

    async fn push_mirror(
        &self,
        mirror: &LocalMirror,
        destination_url: &str,
    ) -> Result<(), TransferError>;
}

pub struct GitCli {
    source_token: String,
    destination_token: String,
    ref_scope: RefScope,
    work_dir: Option<PathBuf>,
}

impl GitCli {
    pub fn new(config: &Config) -> Self {
        GitCli {
            source_token: config.credentials.source_token.clone(),
            destination_token: config.credentials.destination_token.clone(),
            ref_scope: config.ref_scope,
            work_dir: config.work_dir.clone(),
        }
    }

    fn secrets(&self) -> [&str; 2] {
        [self.source_token.as_str(), self.destination_token.as_str()]
    }

    fn temp_dir(&self) -> std::io::Result<TempDir> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("gitmigrate-");
            builder
        };

        match &self.work_dir {
            Some(base) => {
                std::fs::create_dir_all(base)?;
                builder.tempdir_in(base)
            }
            None => builder.tempdir(),
        }
    }

    async fn run(&self, args: Vec<OsString>) -> Result<String, String> {
        let mut cmd = Command::new("git");
        cmd.args(&args);

        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd
            .output()
            .await
            .map_err(|e| format!("failed to spawn git: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(redact(
                &format!("git failed ({}): {}", output.status, stderr.trim()),
                &self.secrets(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn count_refs(&self, mirror: &Path) -> Option<usize> {
        let args = vec![
            OsString::from("-C"),
            mirror.as_os_str().to_owned(),
            OsString::from("for-each-ref"),
            OsString::from("--format=%(refname)"),
        ];

        match self.run(args).await {
            Ok(stdout) => Some(stdout.lines().filter(|l| !l.is_empty()).count()),
            Err(detail) => {
                warn!(%detail, "could not list mirrored refs");
                None
            }
        }
    }
}

#[async_trait]
impl GitMirror for GitCli {
    async fn clone_mirror(&self, source_url: &str) -> Result<LocalMirror, TransferError> {
        let dir = self.temp_dir().map_err(|e| {
            TransferError::SourceUnreachable(format!("could not create clone directory: {}", e))
        })?;
        let path = dir.path().join("mirror.git");

        info!(path = %path.display(), "cloning source mirror");

        let url = with_credentials(source_url, SOURCE_USERNAME, &self.source_token);
        let args = vec![
            OsString::from("clone"),
            OsString::from("--mirror"),
            OsString::from(url),
            path.as_os_str().to_owned(),
        ];

        self.run(args)
            .await
            .map_err(|detail| classify(detail, TransferError::SourceUnreachable))?;

        if let Some(refs) = self.count_refs(&path).await {
            info!(refs, "source mirror cloned");
        }

        Ok(LocalMirror {
            path,
            _dir: Some(dir),
        })
    }

    async fn push_mirror(
        &self,
        mirror: &LocalMirror,
        destination_url: &str,
    ) -> Result<(), TransferError> {
        let url = with_credentials(destination_url, DESTINATION_USERNAME, &self.destination_token);

        let mut args = vec![
            OsString::from("-C"),
            mirror.path().as_os_str().to_owned(),
            OsString::from("push"),
        ];
        match self.ref_scope {
            RefScope::All => {
                args.push(OsString::from("--mirror"));
                args.push(OsString::from(url));
            }
            RefScope::BranchesAndTags => {
                args.push(OsString::from("--force"));
                args.push(OsString::from("--prune"));
                args.push(OsString::from(url));
                args.push(OsString::from("+refs/heads/*:refs/heads/*"));
                args.push(OsString::from("+refs/tags/*:refs/tags/*"));
            }
        }

        info!(scope = ?self.ref_scope, "pushing refs to destination");

        self.run(args)
            .await
            .map_err(|detail| classify(detail, TransferError::PushFailure))?;

        debug!("push complete");
        Ok(())
    }
}

/// Embeds `username:token` into HTTP(S) URLs. Other URLs (local paths, ssh)
/// are returned untouched.
pub fn with_credentials(url: &str, username: &str, token: &str) -> String {
    let mut parsed = match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
        _ => return url.to_string(),
    };

    if parsed.set_username(username).is_err() || parsed.set_password(Some(token)).is_err() {
        return url.to_string();
    }

    parsed.to_string()
}

/// Shorter secrets are only masked inside URLs; as bare text they would
/// match ordinary words.
const MIN_SECRET_LEN: usize = 8;

fn url_password() -> &'static Regex {
    static PASSWORD: OnceLock<Regex> = OnceLock::new();
    PASSWORD.get_or_init(|| {
        Regex::new(r"([A-Za-z][A-Za-z0-9+.-]*://[^/@\s:]*):[^/@\s]*@")
            .expect("url password pattern is a valid regex")
    })
}

/// `secret` as `Url::set_password` writes it.
fn percent_encoded(secret: &str) -> Option<String> {
    let mut url = Url::parse("https://host/").ok()?;
    url.set_password(Some(secret)).ok()?;
    url.password().map(str::to_string)
}

/// Masks the password of every URL in `text`, then every remaining
/// occurrence of a secret, raw or percent-encoded.
pub fn redact(text: &str, secrets: &[&str]) -> String {
    let masked = url_password().replace_all(text, "${1}:***@").into_owned();

    secrets
        .iter()
        .filter(|secret| secret.len() >= MIN_SECRET_LEN)
        .fold(masked, |acc, secret| {
            let acc = acc.replace(secret, "***");
            match percent_encoded(secret) {
                Some(encoded) if encoded != *secret => acc.replace(&encoded, "***"),
                _ => acc,
            }
        })
}

fn auth_patterns() -> &'static RegexSet {
    static PATTERNS: OnceLock<RegexSet> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        RegexSet::new([
            r"(?i)authentication failed",
            r"(?i)could not read username",
            r"(?i)http basic: access denied",
            r"(?i)invalid username or password",
            r"(?i)the requested url returned error: 40[13]",
            r"(?i)permission to \S+ denied",
        ])
        .expect("authentication patterns are valid regexes")
    })
}

/// Maps git stderr to a transfer error; authentication problems win over the
/// step-specific `fallback`.
pub fn classify(detail: String, fallback: fn(String) -> TransferError) -> TransferError {
    if auth_patterns().is_match(&detail) {
        TransferError::AuthenticationFailure(detail)
    } else {
        fallback(detail)
    }
}
