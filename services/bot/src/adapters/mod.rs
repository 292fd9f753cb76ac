pub mod dynamo;
pub mod openai;
pub mod s3;
pub mod telegram;

pub use dynamo::DynamoUserStore;
pub use openai::OpenAiModel;
pub use s3::S3ImageStorage;
pub use telegram::TelegramTransport;
