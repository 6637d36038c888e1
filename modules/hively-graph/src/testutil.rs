//! Test utilities: a real Neo4j instance via testcontainers and an
//! in-memory PrimaryStore for driving the resync job.

use async_trait::async_trait;
use testcontainers::{
    core::{ContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use uuid::Uuid;

use hively_common::{CommunityState, PostRecord, PrimaryStore, StoreResult, UserRecord};

use crate::GraphClient;

/// Spin up a Neo4j container and return the container handle + connected GraphClient.
///
/// The container is dropped (and stopped) when `ContainerAsync` goes out of scope,
/// so callers must hold it alive for the duration of the test.
pub async fn neo4j_container() -> (ContainerAsync<GenericImage>, GraphClient) {
    let image = GenericImage::new("neo4j", "5.25.1")
        .with_exposed_port(ContainerPort::Tcp(7687))
        .with_wait_for(WaitFor::message_on_stdout("Started."))
        .with_env_var("NEO4J_AUTH", "neo4j/test");

    let container: ContainerAsync<GenericImage> = image
        .start()
        .await
        .expect("Failed to start Neo4j container");

    let host_port = container
        .get_host_port_ipv4(7687)
        .await
        .expect("Failed to get Neo4j host port");

    let uri = format!("bolt://127.0.0.1:{host_port}");
    let client = GraphClient::connect(&uri, "neo4j", "test")
        .await
        .expect("Failed to connect to Neo4j");

    (container, client)
}

/// In-memory primary store. Tests seed the public fields directly.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub users: Vec<UserRecord>,
    pub posts: Vec<PostRecord>,
    pub communities: Vec<CommunityState>,
    pub follows: Vec<(Uuid, Uuid)>,
    pub likes: Vec<(Uuid, Uuid)>,
}

#[async_trait]
impl PrimaryStore for MemoryStore {
    async fn users(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.users.clone())
    }

    async fn posts(&self) -> StoreResult<Vec<PostRecord>> {
        Ok(self.posts.clone())
    }

    async fn communities(&self) -> StoreResult<Vec<CommunityState>> {
        Ok(self.communities.clone())
    }

    async fn follows(&self) -> StoreResult<Vec<(Uuid, Uuid)>> {
        Ok(self.follows.clone())
    }

    async fn likes(&self) -> StoreResult<Vec<(Uuid, Uuid)>> {
        Ok(self.likes.clone())
    }
}
