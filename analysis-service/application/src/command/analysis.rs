use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    AnalysisResponse, AnalysisUseCase, Command, CommandError, CommandHandler, DeleteItemRequest,
    DeleteItemResponse, ExtractFramesRequest, FullAnalysisRequest, GenerateParagraphRequest,
    GetItemRequest, GetItemResponse, InvalidateAnalysisRequest, InvalidateAnalysisResponse,
    ItemCatalogUseCase, ListItemsRequest, ListItemsResponse, LookupReferenceRequest,
    ReferenceResponse, RegisterItemRequest, RegisterItemResponse,
};

fn validation_error(errors: ValidationErrors) -> CommandError {
    CommandError::validation("invalid_request", errors.to_string())
}

macro_rules! analysis_command {
    ($command:ident, $request:ty, $result:ty, $command_type:literal) => {
        #[derive(Debug, Clone)]
        pub struct $command {
            id: Uuid,
            pub request: $request,
        }

        impl $command {
            pub fn new(request: $request) -> Self {
                Self {
                    id: Uuid::new_v4(),
                    request,
                }
            }
        }

        impl Command for $command {
            type Result = $result;

            fn command_type(&self) -> &'static str {
                $command_type
            }

            fn command_id(&self) -> Uuid {
                self.id
            }

            fn validate(&self) -> Result<(), CommandError> {
                self.request.validate().map_err(validation_error)
            }
        }
    };
}

analysis_command!(FullAnalysisCommand, FullAnalysisRequest, AnalysisResponse, "full_analysis");
analysis_command!(
    GenerateParagraphCommand,
    GenerateParagraphRequest,
    AnalysisResponse,
    "generate_paragraph"
);
analysis_command!(ExtractFramesCommand, ExtractFramesRequest, AnalysisResponse, "extract_frames");
analysis_command!(
    LookupReferenceCommand,
    LookupReferenceRequest,
    ReferenceResponse,
    "lookup_reference"
);
analysis_command!(
    InvalidateAnalysisCommand,
    InvalidateAnalysisRequest,
    InvalidateAnalysisResponse,
    "invalidate_analysis"
);
analysis_command!(RegisterItemCommand, RegisterItemRequest, RegisterItemResponse, "register_item");
analysis_command!(ListItemsCommand, ListItemsRequest, ListItemsResponse, "list_items");
analysis_command!(GetItemCommand, GetItemRequest, GetItemResponse, "get_item");
analysis_command!(DeleteItemCommand, DeleteItemRequest, DeleteItemResponse, "delete_item");

pub struct AnalysisCommandHandler {
    analysis: Arc<dyn AnalysisUseCase>,
    items: Arc<dyn ItemCatalogUseCase>,
}

impl AnalysisCommandHandler {
    pub fn new(analysis: Arc<dyn AnalysisUseCase>, items: Arc<dyn ItemCatalogUseCase>) -> Self {
        Self { analysis, items }
    }
}

#[async_trait]
impl CommandHandler<FullAnalysisCommand> for AnalysisCommandHandler {
    async fn handle(&self, command: FullAnalysisCommand) -> Result<AnalysisResponse, CommandError> {
        self.analysis
            .full_analysis(command.request)
            .await
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl CommandHandler<GenerateParagraphCommand> for AnalysisCommandHandler {
    async fn handle(
        &self,
        command: GenerateParagraphCommand,
    ) -> Result<AnalysisResponse, CommandError> {
        self.analysis
            .generate_paragraph(command.request)
            .await
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl CommandHandler<ExtractFramesCommand> for AnalysisCommandHandler {
    async fn handle(&self, command: ExtractFramesCommand) -> Result<AnalysisResponse, CommandError> {
        self.analysis
            .extract_frames(command.request)
            .await
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl CommandHandler<LookupReferenceCommand> for AnalysisCommandHandler {
    async fn handle(
        &self,
        command: LookupReferenceCommand,
    ) -> Result<ReferenceResponse, CommandError> {
        self.analysis
            .lookup_reference(command.request)
            .await
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl CommandHandler<InvalidateAnalysisCommand> for AnalysisCommandHandler {
    async fn handle(
        &self,
        command: InvalidateAnalysisCommand,
    ) -> Result<InvalidateAnalysisResponse, CommandError> {
        self.analysis
            .invalidate(command.request)
            .await
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl CommandHandler<RegisterItemCommand> for AnalysisCommandHandler {
    async fn handle(
        &self,
        command: RegisterItemCommand,
    ) -> Result<RegisterItemResponse, CommandError> {
        self.items
            .register_item(command.request)
            .await
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl CommandHandler<ListItemsCommand> for AnalysisCommandHandler {
    async fn handle(&self, command: ListItemsCommand) -> Result<ListItemsResponse, CommandError> {
        self.items
            .list_items(command.request)
            .await
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl CommandHandler<GetItemCommand> for AnalysisCommandHandler {
    async fn handle(&self, command: GetItemCommand) -> Result<GetItemResponse, CommandError> {
        self.items
            .get_item(command.request)
            .await
            .map_err(CommandError::from)
    }
}

#[async_trait]
impl CommandHandler<DeleteItemCommand> for AnalysisCommandHandler {
    async fn handle(&self, command: DeleteItemCommand) -> Result<DeleteItemResponse, CommandError> {
        self.items
            .delete_item(command.request)
            .await
            .map_err(CommandError::from)
    }
}
