use crate::domain::model::DrawResult;
use crate::core::store::RecordStore;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Replaces `to` with `from` in one step.
    fn rename_file(&self, from: &str, to: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn bull_file(&self) -> &str;
    fn female_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn donator_file(&self) -> &str;
    fn junior_file(&self) -> &str;
    /// `None` draws with a fresh seed from the operating system.
    fn seed(&self) -> Option<u64>;
    fn write_match_log(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RecordStore>;
    async fn transform(&self, store: RecordStore) -> Result<DrawResult>;
    async fn load(&self, result: DrawResult) -> Result<String>;
}
