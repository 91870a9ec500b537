// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::config::Config;

/// Language runtime of the observed function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    Node,
    Python,
    Unknown,
}

impl Runtime {
    /// Resolves the runtime from `AWS_EXECUTION_ENV`, e.g. `AWS_Lambda_nodejs18.x`.
    pub fn from_execution_env(execution_env: &str) -> Runtime {
        let name = execution_env
            .strip_prefix("AWS_Lambda_")
            .unwrap_or(execution_env);
        if name.starts_with("nodejs") {
            Runtime::Node
        } else if name.starts_with("python") {
            Runtime::Python
        } else {
            Runtime::Unknown
        }
    }
}

/// Whether an in-process SDK is capturing telemetry alongside this pipeline.
///
/// Constructed once at startup and handed to every component that needs to
/// know, so the answer stays fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrumentation {
    active: bool,
    runtime: Runtime,
}

impl Instrumentation {
    pub fn new(active: bool, runtime: Runtime) -> Self {
        Instrumentation { active, runtime }
    }

    pub fn from_config(config: &Config) -> Self {
        Instrumentation::new(
            config.internal_extension,
            Runtime::from_execution_env(&config.execution_env),
        )
    }

    /// No SDK present, the pipeline is on its own.
    pub fn external(runtime: Runtime) -> Self {
        Instrumentation::new(false, runtime)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime
    }
}
