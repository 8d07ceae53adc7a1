//! Sound server queries through `pactl`.
//!
//! Every call runs under a time limit so a wedged sound server costs one
//! slow block instead of freezing the bar.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::core::sources::{AudioServer, Sink, SinkList};
use crate::error::{Result, StatusError};

/// `PA_VOLUME_NORM`: 100% volume
const VOLUME_NORM: u64 = 65536;
/// Longest a single `pactl` run may take
pub const PACTL_TIMEOUT: Duration = Duration::from_millis(300);
const EXIT_CHECK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Deserialize)]
struct PactlSink {
    name: String,
    mute: bool,
    volume: HashMap<String, PactlChannel>,
}

#[derive(Debug, Deserialize)]
struct PactlChannel {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct PactlInfo {
    default_sink_name: Option<String>,
}

/// Audio client backed by the `pactl` command-line tool
#[derive(Debug, Clone)]
pub struct PactlClient {
    command: Vec<OsString>,
    timeout: Duration,
}

impl Default for PactlClient {
    fn default() -> Self {
        Self {
            command: vec!["pactl".into()],
            timeout: PACTL_TIMEOUT,
        }
    }
}

impl PactlClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `command` (program plus leading arguments) in place of `pactl`
    pub fn with_command<I, S>(command: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let (program, leading) = self
            .command
            .split_first()
            .ok_or_else(|| StatusError::audio("empty pactl command"))?;
        let mut command = Command::new(program);
        command.args(leading).args(args);
        run_with_timeout(command, self.timeout)
            .map_err(|e| StatusError::audio(format!("pactl {}: {}", args.join(" "), e)))
    }
}

impl AudioServer for PactlClient {
    fn sinks(&mut self) -> Result<SinkList> {
        let listing = self.run(&["--format=json", "list", "sinks"])?;
        let sinks = parse_sinks(&listing)?;
        let default_sink = match self
            .run(&["--format=json", "info"])
            .and_then(|info| parse_default_sink(&info))
        {
            Ok(name) => Some(name),
            Err(e) => {
                log::debug!("default sink: {}", e);
                None
            }
        };
        Ok(SinkList {
            sinks,
            default_sink,
        })
    }
}

/// Run to completion and return stdout, killing the child once `timeout`
/// has passed
fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<String> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| StatusError::audio("no stdout pipe"))?;
    // Drain on a side thread so a large listing cannot fill the pipe
    let reader = thread::spawn(move || {
        let mut out = String::new();
        stdout.read_to_string(&mut out).map(|_| out)
    });

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(StatusError::audio(format!(
                "no answer within {} ms",
                timeout.as_millis()
            )));
        }
        thread::sleep(EXIT_CHECK_INTERVAL);
    };

    let output = reader
        .join()
        .map_err(|_| StatusError::audio("output reader panicked"))??;
    if !status.success() {
        return Err(StatusError::audio(format!("exited with {}", status)));
    }
    Ok(output)
}

/// Parse `pactl --format=json list sinks`
pub fn parse_sinks(json: &str) -> Result<Vec<Sink>> {
    let raw: Vec<PactlSink> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|s| {
            let channels = s.volume.len().max(1) as u64;
            let sum: u64 = s.volume.values().map(|c| c.value).sum();
            Sink {
                name: s.name,
                volume_percent: (sum / channels * 100 / VOLUME_NORM) as u32,
                muted: s.mute,
            }
        })
        .collect())
}

/// Default sink name from `pactl --format=json info`
pub fn parse_default_sink(json: &str) -> Result<String> {
    let info: PactlInfo = serde_json::from_str(json)?;
    info.default_sink_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| StatusError::audio("server reports no default sink"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::MetricSample;
    use crate::core::sources::VolumeSource;
    use std::fs;
    use tempfile::TempDir;

    const SINKS: &str = r#"[
      {"index": 47, "state": "RUNNING", "name": "alsa_output.pci-0000_00_1f.3.analog-stereo",
       "mute": false,
       "volume": {"front-left": {"value": 32768, "value_percent": "50%", "db": "-18.06 dB"},
                  "front-right": {"value": 39322, "value_percent": "60%", "db": "-13.31 dB"}},
       "balance": 0.1},
      {"index": 48, "name": "bluez_output.headset", "mute": true,
       "volume": {"mono": {"value": 65536, "value_percent": "100%", "db": "0.00 dB"}}}
    ]"#;

    #[test]
    fn test_parse_sinks() {
        let sinks = parse_sinks(SINKS).unwrap();
        assert_eq!(sinks.len(), 2);
        assert_eq!(sinks[0].name, "alsa_output.pci-0000_00_1f.3.analog-stereo");
        assert_eq!(sinks[0].volume_percent, 55);
        assert!(!sinks[0].muted);
        assert_eq!(sinks[1].volume_percent, 100);
        assert!(sinks[1].muted);
    }

    #[test]
    fn test_parse_sinks_rejects_garbage() {
        assert!(parse_sinks("Connection failure").is_err());
    }

    #[test]
    fn test_parse_default_sink() {
        let info = r#"{"server_string": "/run/user/1000/pulse/native", "server_name": "PulseAudio (on PipeWire 1.0.5)",
                       "default_sink_name": "alsa_output.usb", "default_source_name": "alsa_input.usb"}"#;
        assert_eq!(parse_default_sink(info).unwrap(), "alsa_output.usb");
        assert!(parse_default_sink(r#"{"default_sink_name": ""}"#).is_err());
        assert!(parse_default_sink("{}").is_err());
    }

    fn fake_pactl(script: &str) -> (TempDir, PactlClient) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pactl.sh");
        fs::write(&path, script).unwrap();
        let client = PactlClient::with_command(
            [OsString::from("sh"), path.into_os_string()],
            Duration::from_millis(200),
        );
        (dir, client)
    }

    #[test]
    fn test_hung_server_is_cut_off() {
        let (_dir, client) = fake_pactl("exec sleep 5\n");
        let mut volume = VolumeSource::new(Box::new(client));

        let started = Instant::now();
        assert_eq!(
            volume.sample(),
            MetricSample::red("couldn't find default sink")
        );
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_sinks_from_fake_server() {
        let script = format!(
            "case \"$*\" in\n*sinks*) cat <<'EOF'\n{}\nEOF\n;;\n*info*) echo '{{\"default_sink_name\": \"bluez_output.headset\"}}' ;;\nesac\n",
            SINKS
        );
        let (_dir, mut client) = fake_pactl(&script);

        let list = client.sinks().unwrap();
        assert_eq!(list.sinks.len(), 2);
        let default = list.default_sink().unwrap();
        assert_eq!(default.name, "bluez_output.headset");
        assert!(default.muted);
    }

    #[test]
    fn test_failing_command_is_an_error() {
        let (_dir, client) = fake_pactl("echo 'Connection failure' >&2\nexit 1\n");
        assert!(client.run(&["info"]).is_err());
    }
}
