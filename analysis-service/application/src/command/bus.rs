use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("validation failed [{code}]: {message}")]
    Validation { code: String, message: String },

    #[error("not found [{code}]: {message}")]
    NotFound { code: String, message: String },

    #[error("upstream failure [{code}]: {message}")]
    Upstream { code: String, message: String },

    #[error("infrastructure error [{code}]: {message}")]
    Infrastructure { code: String, message: String },
}

impl CommandError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn upstream(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Infrastructure {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Validation { code, .. }
            | Self::NotFound { code, .. }
            | Self::Upstream { code, .. }
            | Self::Infrastructure { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::NotFound { message, .. }
            | Self::Upstream { message, .. }
            | Self::Infrastructure { message, .. } => message,
        }
    }
}

pub trait Command: Send + 'static {
    type Result: Send + 'static;

    fn command_type(&self) -> &'static str;
    fn command_id(&self) -> Uuid;
    fn validate(&self) -> Result<(), CommandError>;
}

#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C) -> Result<C::Result, CommandError>;
}

#[derive(Debug, Clone)]
pub struct CommandContext {
    pub correlation_id: Uuid,
}

impl CommandContext {
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}

struct RegisteredHandler {
    name: String,
    // Holds an `Arc<dyn CommandHandler<C>>` for the command type keyed in the registry.
    handler: Box<dyn Any + Send + Sync>,
}

pub struct CommandRegistry {
    handlers: HashMap<TypeId, RegisteredHandler>,
}

impl CommandRegistry {
    fn handler<C: Command>(&self) -> Option<(&str, Arc<dyn CommandHandler<C>>)> {
        let entry = self.handlers.get(&TypeId::of::<C>())?;
        entry
            .handler
            .downcast_ref::<Arc<dyn CommandHandler<C>>>()
            .map(|handler| (entry.name.as_str(), Arc::clone(handler)))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[derive(Default)]
pub struct CommandRegistryBuilder {
    handlers: HashMap<TypeId, RegisteredHandler>,
}

impl CommandRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C, H>(mut self, name: impl Into<String>, handler: Arc<H>) -> Self
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let handler: Arc<dyn CommandHandler<C>> = handler;
        self.handlers.insert(
            TypeId::of::<C>(),
            RegisteredHandler {
                name: name.into(),
                handler: Box::new(handler),
            },
        );
        self
    }

    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            handlers: self.handlers,
        }
    }
}

/// Validates commands and dispatches them to their registered handler.
pub struct GenericCommandService {
    registry: Arc<CommandRegistry>,
}

impl GenericCommandService {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute<C: Command>(
        &self,
        command: C,
        context: CommandContext,
    ) -> Result<C::Result, CommandError> {
        let command_type = command.command_type();
        let command_id = command.command_id();
        let Some((name, handler)) = self.registry.handler::<C>() else {
            tracing::error!(command_type, "no handler registered");
            return Err(CommandError::infrastructure(
                "handler_missing",
                format!("no handler registered for `{command_type}`"),
            ));
        };

        if let Err(error) = command.validate() {
            tracing::warn!(
                command_type,
                %command_id,
                correlation_id = %context.correlation_id,
                error = %error,
                "command rejected"
            );
            return Err(error);
        }

        tracing::debug!(
            handler = name,
            %command_id,
            correlation_id = %context.correlation_id,
            "executing command"
        );
        let started = Instant::now();
        let result = handler.handle(command).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::debug!(handler = name, %command_id, elapsed_ms, "command completed"),
            Err(error) => tracing::warn!(
                handler = name,
                %command_id,
                elapsed_ms,
                error = %error,
                "command failed"
            ),
        }
        result
    }
}
