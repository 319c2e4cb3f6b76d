//! Blocking variant derivation
//!
//! Wraps a non-blocking descriptor instead of re-synthesizing it, so the
//! blocking variant always embeds the same single wire invocation.

use clientgen_common::{
    ArgumentValue, ControlFlow, ConvenienceOperation, Execution, GeneratorSettings, GuardFailure,
    OperationCategory, ParameterLocation, SyntheticDefault, TypeRef,
};
use tracing::debug;

pub struct BlockingDeriver<'a> {
    settings: &'a GeneratorSettings,
}

impl<'a> BlockingDeriver<'a> {
    pub fn new(settings: &'a GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Derive the blocking counterpart of a non-blocking descriptor
    pub fn derive(&self, non_blocking: &ConvenienceOperation) -> ConvenienceOperation {
        let mut blocking = non_blocking.clone();
        blocking.execution = Execution::Blocking;

        for guard in &mut blocking.guards {
            guard.failure = GuardFailure::Raise;
        }

        if non_blocking.category == OperationCategory::RawPassthrough
            && !self.settings.blocking_context_propagation
        {
            Self::strip_context(&mut blocking);
        }

        let inner = Box::new(blocking.body);
        blocking.body = match blocking.category {
            OperationCategory::Plain | OperationCategory::RawPassthrough => {
                ControlFlow::BlockOn { inner }
            }
            OperationCategory::Paged => ControlFlow::IteratePages { inner },
            OperationCategory::LongRunning => ControlFlow::ExtractSyncPoller { inner },
        };

        debug!(
            operation = %blocking.name,
            template = blocking.body.template(),
            "derived blocking operation"
        );

        blocking
    }

    /// Remove context carriers from the signature; the invocation gets an
    /// empty context instead
    fn strip_context(op: &mut ConvenienceOperation) {
        let removed: Vec<String> = op
            .parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Context || p.type_ref == TypeRef::Context)
            .map(|p| p.name.clone())
            .collect();

        if removed.is_empty() {
            return;
        }

        op.parameters.retain(|p| !removed.contains(&p.name));

        if let ControlFlow::Passthrough { invocation } = &mut op.body {
            for argument in &mut invocation.arguments {
                if matches!(&argument.value, ArgumentValue::Parameter { name, .. } if removed.contains(name))
                {
                    argument.value = ArgumentValue::Default {
                        value: SyntheticDefault::Context,
                    };
                }
            }
        }
    }
}
