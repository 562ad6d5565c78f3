use std::sync::Arc;

use crate::{
    AnalysisCommandHandler, AnalysisUseCase, CommandRegistry, CommandRegistryBuilder,
    DeleteItemCommand, ExtractFramesCommand, FullAnalysisCommand, GenerateParagraphCommand,
    GetItemCommand, InvalidateAnalysisCommand, ItemCatalogUseCase, ListItemsCommand,
    LookupReferenceCommand, RegisterItemCommand,
};

pub struct AnalysisCommandRegistryFactory;

impl AnalysisCommandRegistryFactory {
    pub fn create_registry(
        analysis: Arc<dyn AnalysisUseCase>,
        items: Arc<dyn ItemCatalogUseCase>,
    ) -> CommandRegistry {
        let handler = Arc::new(AnalysisCommandHandler::new(analysis, items));

        CommandRegistryBuilder::new()
            .register::<FullAnalysisCommand, _>("full_analysis", handler.clone())
            .register::<GenerateParagraphCommand, _>("generate_paragraph", handler.clone())
            .register::<ExtractFramesCommand, _>("extract_frames", handler.clone())
            .register::<LookupReferenceCommand, _>("lookup_reference", handler.clone())
            .register::<InvalidateAnalysisCommand, _>("invalidate_analysis", handler.clone())
            .register::<RegisterItemCommand, _>("register_item", handler.clone())
            .register::<ListItemsCommand, _>("list_items", handler.clone())
            .register::<GetItemCommand, _>("get_item", handler.clone())
            .register::<DeleteItemCommand, _>("delete_item", handler)
            .build()
    }
}
