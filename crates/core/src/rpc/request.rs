//! Closed model of the RPC requests the transport understands
//!
//! Only the fields the transport needs for routing are modelled; everything
//! else in a payload is ignored. Request types outside this set decode to
//! [`RpcRequest::Other`].

use querylink_domain::ConnectionId;
use serde::{Deserialize, Serialize};

/// Request scoped to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionScoped {
    pub connection_id: ConnectionId,
}

/// Request scoped to a statement on a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementScoped {
    pub connection_id: ConnectionId,
    pub statement_id: u32,
}

/// Handle of a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementHandle {
    pub connection_id: ConnectionId,
    pub id: u32,
}

/// Execution of a previously prepared statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStatement {
    pub statement_handle: StatementHandle,
}

/// Metadata lookup. Older clients omit the connection id on some of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataLookup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<ConnectionId>,
}

/// Coarse request category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// Connection lifecycle (open, close, sync)
    Connection,
    /// Statement bookkeeping and result paging
    Statement,
    /// Statement execution: single, prepare-and-execute, batch
    Execute,
    Transaction,
    Metadata,
    Other,
}

/// Decoded RPC request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "camelCase")]
pub enum RpcRequest {
    OpenConnection(ConnectionScoped),
    CloseConnection(ConnectionScoped),
    ConnectionSync(ConnectionScoped),
    CreateStatement(ConnectionScoped),
    CloseStatement(StatementScoped),
    Prepare(ConnectionScoped),
    PrepareAndExecute(StatementScoped),
    Execute(ExecuteStatement),
    PrepareAndExecuteBatch(StatementScoped),
    ExecuteBatch(StatementScoped),
    Fetch(StatementScoped),
    SyncResults(StatementScoped),
    Commit(ConnectionScoped),
    Rollback(ConnectionScoped),
    DatabaseProperties(MetadataLookup),
    GetCatalogs(MetadataLookup),
    GetSchemas(MetadataLookup),
    GetTables(MetadataLookup),
    GetColumns(MetadataLookup),
    GetTableTypes(MetadataLookup),
    GetTypeInfo(MetadataLookup),
    #[serde(other)]
    Other,
}

impl RpcRequest {
    /// Connection the request belongs to, read from its structured fields.
    pub fn connection_id(&self) -> Option<&ConnectionId> {
        match self {
            Self::OpenConnection(req)
            | Self::CloseConnection(req)
            | Self::ConnectionSync(req)
            | Self::CreateStatement(req)
            | Self::Prepare(req)
            | Self::Commit(req)
            | Self::Rollback(req) => Some(&req.connection_id),
            Self::CloseStatement(req)
            | Self::PrepareAndExecute(req)
            | Self::PrepareAndExecuteBatch(req)
            | Self::ExecuteBatch(req)
            | Self::Fetch(req)
            | Self::SyncResults(req) => Some(&req.connection_id),
            Self::Execute(req) => Some(&req.statement_handle.connection_id),
            Self::DatabaseProperties(req)
            | Self::GetCatalogs(req)
            | Self::GetSchemas(req)
            | Self::GetTables(req)
            | Self::GetColumns(req)
            | Self::GetTableTypes(req)
            | Self::GetTypeInfo(req) => req.connection_id.as_ref(),
            Self::Other => None,
        }
    }

    pub fn class(&self) -> RequestClass {
        match self {
            Self::OpenConnection(_) | Self::CloseConnection(_) | Self::ConnectionSync(_) => {
                RequestClass::Connection
            }
            Self::CreateStatement(_)
            | Self::CloseStatement(_)
            | Self::Prepare(_)
            | Self::Fetch(_)
            | Self::SyncResults(_) => RequestClass::Statement,
            Self::PrepareAndExecute(_)
            | Self::Execute(_)
            | Self::PrepareAndExecuteBatch(_)
            | Self::ExecuteBatch(_) => RequestClass::Execute,
            Self::Commit(_) | Self::Rollback(_) => RequestClass::Transaction,
            Self::DatabaseProperties(_)
            | Self::GetCatalogs(_)
            | Self::GetSchemas(_)
            | Self::GetTables(_)
            | Self::GetColumns(_)
            | Self::GetTableTypes(_)
            | Self::GetTypeInfo(_) => RequestClass::Metadata,
            Self::Other => RequestClass::Other,
        }
    }

    /// Wire name of the request type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenConnection(_) => "openConnection",
            Self::CloseConnection(_) => "closeConnection",
            Self::ConnectionSync(_) => "connectionSync",
            Self::CreateStatement(_) => "createStatement",
            Self::CloseStatement(_) => "closeStatement",
            Self::Prepare(_) => "prepare",
            Self::PrepareAndExecute(_) => "prepareAndExecute",
            Self::Execute(_) => "execute",
            Self::PrepareAndExecuteBatch(_) => "prepareAndExecuteBatch",
            Self::ExecuteBatch(_) => "executeBatch",
            Self::Fetch(_) => "fetch",
            Self::SyncResults(_) => "syncResults",
            Self::Commit(_) => "commit",
            Self::Rollback(_) => "rollback",
            Self::DatabaseProperties(_) => "databaseProperties",
            Self::GetCatalogs(_) => "getCatalogs",
            Self::GetSchemas(_) => "getSchemas",
            Self::GetTables(_) => "getTables",
            Self::GetColumns(_) => "getColumns",
            Self::GetTableTypes(_) => "getTableTypes",
            Self::GetTypeInfo(_) => "getTypeInfo",
            Self::Other => "other",
        }
    }

    pub fn is_execute_class(&self) -> bool {
        self.class() == RequestClass::Execute
    }

    pub fn opens_connection(&self) -> bool {
        matches!(self, Self::OpenConnection(_))
    }
}
