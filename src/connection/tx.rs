use super::Connection;
use crate::error::Result;

/// Manual transaction control. Calls must be paired by the caller; there is no automatic
/// rollback on error and no nesting.
impl Connection {
    /// # Errors
    /// Returns `TablekitError::QueryError` if the backend rejects the statement.
    pub fn begin_transaction(&mut self) -> Result<()> {
        let sql = self.driver.begin_sql();
        self.execute_batch(sql)
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` if no transaction is open or the commit fails.
    pub fn commit(&mut self) -> Result<()> {
        let sql = self.driver.commit_sql();
        self.execute_batch(sql)
    }

    /// # Errors
    /// Returns `TablekitError::QueryError` if no transaction is open.
    pub fn rollback(&mut self) -> Result<()> {
        let sql = self.driver.rollback_sql();
        self.execute_batch(sql)
    }
}
