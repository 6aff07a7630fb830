//! `yt-dlp` subprocess backend.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use url::Url;

use super::{parse_info_json, ExtractError, Extractor, VideoInfo};

/// Runs `yt-dlp --dump-single-json` and parses its output.
/// Blocks until the subprocess exits; call from `spawn_blocking` if used from async code.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    program: PathBuf,
    socket_timeout_secs: Option<u64>,
}

impl YtDlpExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            socket_timeout_secs: None,
        }
    }

    pub fn with_socket_timeout(mut self, secs: u64) -> Self {
        self.socket_timeout_secs = Some(secs);
        self
    }

    fn args(&self, url: &Url) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--dump-single-json".into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--skip-download".into(),
        ];
        if let Some(secs) = self.socket_timeout_secs {
            args.push("--socket-timeout".into());
            args.push(secs.to_string().into());
        }
        args.push(url.as_str().into());
        args
    }
}

/// Last non-empty stderr line, which is where yt-dlp puts its `ERROR:` message.
fn failure_message(stderr: &[u8], status: std::process::ExitStatus) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(|l| l.to_string())
        .unwrap_or_else(|| format!("exited with {status}"))
}

impl Extractor for YtDlpExtractor {
    fn extract(&self, url: &Url) -> Result<VideoInfo, ExtractError> {
        tracing::debug!(program = %self.program.display(), %url, "running extractor");
        let output = Command::new(&self.program)
            .args(self.args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    ExtractError::NotInstalled(self.program.display().to_string())
                }
                _ => ExtractError::Spawn(e),
            })?;

        if !output.status.success() {
            let msg = failure_message(&output.stderr, output.status);
            tracing::warn!(status = %output.status, "extractor failed: {}", msg);
            return Err(ExtractError::Failed(msg));
        }

        let info = parse_info_json(&output.stdout)?;
        tracing::debug!(
            id = %info.id,
            streams = info.streams.len(),
            "extractor returned video info"
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://www.youtube.com/watch?v=abc").unwrap()
    }

    #[test]
    fn args_end_with_url() {
        let ex = YtDlpExtractor::new("yt-dlp").with_socket_timeout(15);
        let args = ex.args(&url());
        assert_eq!(args[0], "--dump-single-json");
        assert!(args.contains(&OsString::from("--no-playlist")));
        let pos = args.iter().position(|a| a == "--socket-timeout").unwrap();
        assert_eq!(args[pos + 1], "15");
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn missing_program_is_not_installed() {
        let ex = YtDlpExtractor::new("/nonexistent/dir/yt-dlp");
        assert!(matches!(
            ex.extract(&url()),
            Err(ExtractError::NotInstalled(_))
        ));
    }

    // Both scripts run from one test so no other test forks while they are being written.
    #[cfg(unix)]
    #[test]
    fn runs_script_backends() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let write_script = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        let ok = write_script(
            "ok.sh",
            r#"echo '{"id":"abc","title":"T","formats":[{"format_id":"18","url":"http://x/18","ext":"mp4","height":360,"vcodec":"avc1","acodec":"mp4a"}]}'"#,
        );
        let failing = write_script(
            "fail.sh",
            "echo 'WARNING: noise' >&2\necho 'ERROR: [youtube] abc: Video unavailable' >&2\nexit 1",
        );

        let info = YtDlpExtractor::new(&ok).extract(&url()).unwrap();
        assert_eq!(info.title, "T");
        assert_eq!(info.streams.len(), 1);
        assert!(info.streams[0].is_progressive());

        match YtDlpExtractor::new(&failing).extract(&url()) {
            Err(ExtractError::Failed(msg)) => {
                assert_eq!(msg, "ERROR: [youtube] abc: Video unavailable")
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
