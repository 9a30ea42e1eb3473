//! Device-control channel backed by the `adb` executable.

use crate::{
    ConnectedDevice, DeviceControlChannel, DeviceError, DeviceResult, DeviceState, InstallOptions,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const DEVICES_HEADER: &str = "List of devices attached";

/// Channel that shells out to `adb`.
///
/// # Example
///
/// ```no_run
/// use apkdeploy_device::{AdbServer, DeviceAnalyzer, DeviceControlChannel};
/// use std::path::Path;
///
/// let mut adb = AdbServer::new();
/// adb.init(Path::new("/opt/android-sdk/platform-tools/adb"))?;
/// let spec = DeviceAnalyzer::new(&adb).device_spec(None)?;
/// println!("SDK {}", spec.sdk_version);
/// # Ok::<(), apkdeploy_device::DeviceError>(())
/// ```
#[derive(Debug, Default)]
pub struct AdbServer {
    adb_path: Option<PathBuf>,
}

impl AdbServer {
    /// Create an uninitialized channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn adb_path(&self) -> DeviceResult<&Path> {
        self.adb_path
            .as_deref()
            .ok_or(DeviceError::NotInitialized)
    }

    fn execute(&self, args: &[OsString]) -> DeviceResult<Output> {
        let adb = self.adb_path()?;
        tracing::debug!(adb = %adb.display(), ?args, "Running adb");
        Command::new(adb)
            .args(args)
            .output()
            .map_err(|e| DeviceError::Adb(format!("failed to run {}: {e}", adb.display())))
    }

    /// Run adb and require a zero exit status; returns stdout.
    fn run(&self, args: &[OsString]) -> DeviceResult<String> {
        let output = self.execute(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DeviceError::Adb(if stderr.is_empty() {
                format!("adb exited with {}", output.status)
            } else {
                stderr
            }));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    items.into_iter().map(Into::into).collect()
}

impl DeviceControlChannel for AdbServer {
    fn init(&mut self, executable: &Path) -> DeviceResult<()> {
        self.adb_path = Some(executable.to_path_buf());
        self.run(&args(["start-server"]))?;
        tracing::debug!(adb = %executable.display(), "adb server ready");
        Ok(())
    }

    fn devices(&self) -> DeviceResult<Vec<ConnectedDevice>> {
        let stdout = self.run(&args(["devices", "-l"]))?;
        Ok(parse_devices_output(&stdout))
    }

    fn get_property(&self, serial: &str, name: &str) -> DeviceResult<Option<String>> {
        let stdout = self.run(&args(["-s", serial, "shell", "getprop", name]))?;
        let value = stdout.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    fn install(
        &self,
        serial: &str,
        apks: &[PathBuf],
        options: &InstallOptions,
    ) -> DeviceResult<()> {
        let subcommand = if apks.len() == 1 {
            "install"
        } else {
            "install-multiple"
        };
        let mut command = args(["-s", serial, subcommand]);
        command.push("-r".into());
        if options.allow_downgrade {
            command.push("-d".into());
        }
        command.extend(apks.iter().map(|apk| apk.as_os_str().to_os_string()));

        let output = self.execute(&command)?;
        parse_install_output(
            output.status.success(),
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )
        .map_err(|message| DeviceError::InstallFailed {
            serial: serial.to_string(),
            message,
        })
    }
}

/// Parse the output of `adb devices [-l]`.
#[must_use]
pub fn parse_devices_output(output: &str) -> Vec<ConnectedDevice> {
    output
        .lines()
        .skip_while(|line| !line.starts_with(DEVICES_HEADER))
        .skip(1)
        .filter(|line| !line.trim().is_empty() && !line.starts_with('*'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let serial = fields.next()?;
            let state = fields.next()?;
            Some(ConnectedDevice {
                serial: serial.to_string(),
                state: DeviceState::parse(state),
            })
        })
        .collect()
}

/// Interpret the result of `adb install[-multiple]`.
///
/// adb reports some failures with a zero exit status, so a `Failure` line
/// wins over the exit status. The error carries adb's own wording.
pub fn parse_install_output(success: bool, stdout: &str, stderr: &str) -> Result<(), String> {
    let failure = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|line| line.starts_with("Failure") || line.starts_with("adb: failed"));

    match (failure, success) {
        (Some(line), _) => Err(line.to_string()),
        (None, true) => Ok(()),
        (None, false) => {
            let stderr = stderr.trim();
            Err(if stderr.is_empty() {
                "adb install exited with a non-zero status".to_string()
            } else {
                stderr.to_string()
            })
        }
    }
}
