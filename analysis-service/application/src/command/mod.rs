mod analysis;
mod bus;
mod factory;

pub use analysis::{
    AnalysisCommandHandler, DeleteItemCommand, ExtractFramesCommand, FullAnalysisCommand,
    GenerateParagraphCommand, GetItemCommand, InvalidateAnalysisCommand, ListItemsCommand,
    LookupReferenceCommand, RegisterItemCommand,
};
pub use bus::{
    Command, CommandContext, CommandError, CommandHandler, CommandRegistry,
    CommandRegistryBuilder, GenericCommandService,
};
pub use factory::AnalysisCommandRegistryFactory;
