use crate::entity::BookId;
use crate::repository::{BookRepository, DependOnBookRepository};
use crate::KernelError;

/// Tells whether an ISBN is already taken.
///
/// Always reads through the given connection. Run it on the same transaction as the
/// insert that follows, otherwise a concurrent registration can slip in between.
#[async_trait::async_trait]
pub trait BookDuplicationCheck: 'static + Sync + Send + DependOnBookRepository {
    async fn is_duplicated<Connection: Send>(
        &self,
        con: &mut Connection,
        id: &BookId,
    ) -> error_stack::Result<bool, KernelError>
    where
        Self::BookRepository: BookRepository<Connection>,
    {
        let found = self.book_repository().find(con, id).await?;
        Ok(found.is_some())
    }
}

impl<T> BookDuplicationCheck for T where T: DependOnBookRepository {}
