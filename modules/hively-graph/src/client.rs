use neo4rs::{query, ConfigBuilder, Graph};

/// Shared handle on the Neo4j connection pool. Clones are cheap; the
/// writer, reader, and resync job all borrow the same pool.
#[derive(Clone)]
pub struct GraphClient {
    pub(crate) graph: Graph,
}

impl GraphClient {
    /// Open a pool against a bolt endpoint.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, neo4rs::Error> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(user)
            .password(password)
            .fetch_size(500)
            .max_connections(10)
            .build()
            .unwrap();
        let graph = Graph::connect(config).await?;
        Ok(Self { graph })
    }

    /// Force an actual TCP+bolt handshake. neo4rs pools lazily, so
    /// `connect` succeeds even when the server is down; startup uses this
    /// to decide whether to log a degraded-mode warning.
    pub async fn ping(&self) -> Result<(), neo4rs::Error> {
        self.graph.run(query("RETURN 1")).await
    }

    /// Raw driver access, for ad-hoc Cypher in tests and migrations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}
