//! systemd implementation of the `ServiceSupervisor` port.
//!
//! Commands are invoked directly through the `CommandRunner` (never through a
//! shell string), so every call has its own exit status and timeout.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ServiceSupervisor};

const SYSTEMCTL: &str = "systemctl";
const FUSER: &str = "fuser";
const SUDO: &str = "sudo";

/// Drives `systemctl` and `fuser` through an injected runner.
pub struct SystemdSupervisor<R: CommandRunner> {
    runner: R,
    use_sudo: bool,
}

impl<R: CommandRunner> SystemdSupervisor<R> {
    #[must_use]
    pub fn new(runner: R, use_sudo: bool) -> Self {
        Self { runner, use_sudo }
    }

    async fn invoke(&self, program: &str, args: &[&str]) -> Result<Output> {
        if self.use_sudo {
            let mut full = Vec::with_capacity(args.len() + 1);
            full.push(program);
            full.extend_from_slice(args);
            self.runner.run(SUDO, &full).await
        } else {
            self.runner.run(program, args).await
        }
    }

    async fn systemctl(&self, args: &[&str]) -> Result<Output> {
        self.invoke(SYSTEMCTL, args).await
    }
}

impl<R: CommandRunner> ServiceSupervisor for SystemdSupervisor<R> {
    async fn stop(&self, service: &str) -> Result<Output> {
        self.systemctl(&["stop", service]).await
    }

    async fn disable(&self, service: &str) -> Result<Output> {
        self.systemctl(&["disable", service]).await
    }

    async fn kill_port(&self, port: u16) -> Result<Output> {
        let target = format!("{port}/tcp");
        self.invoke(FUSER, &["-k", &target]).await
    }

    async fn reload(&self) -> Result<Output> {
        self.systemctl(&["daemon-reload"]).await
    }

    async fn enable(&self, service: &str) -> Result<Output> {
        self.systemctl(&["enable", service]).await
    }

    async fn start(&self, service: &str) -> Result<Output> {
        self.systemctl(&["start", service]).await
    }

    async fn status(&self, service: &str) -> Result<Output> {
        self.systemctl(&["status", service, "--no-pager", "-l"]).await
    }
}
