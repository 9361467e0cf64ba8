pub mod firestore;
pub mod local;
pub mod remote;

pub use firestore::FirestoreClient;
pub use local::LocalStore;
pub use remote::{Collection, MemoryRemote, RemoteStore};
