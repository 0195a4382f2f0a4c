//! Clustering core for activity recaps.
//!
//! Provides the tokenizer and TF-IDF vector model, cosine and keyword-overlap
//! similarity, greedy average-linkage thematic clustering, incremental feature
//! clustering with status inference, labeling and cross-cluster connections.
//! Everything here is synchronous and deterministic for a fixed input order.

pub mod connections;
pub mod error;
pub mod feature;
pub mod labeling;
pub mod similarity;
pub mod status;
pub mod thematic;
pub mod tokenizer;
pub mod vector;

pub use connections::{detect_connections, CrossClusterConnection};
pub use error::ClusterError;
pub use feature::{
    build_feature_report, FeatureCluster, FeatureOptions, FeatureReport,
    DEFAULT_FEATURE_THRESHOLD,
};
pub use labeling::{MISCELLANEOUS_FEATURE_NAME, MIXED_ACTIVITY_LABEL};
pub use similarity::{cosine_similarity, overlap_similarity, SimilarityMatrix};
pub use status::{FeatureStatus, NoRepoStatus, RepoStatus, RepoStatusProvider};
pub use thematic::{
    cluster_thematic, ThematicCluster, ThematicOptions, DEFAULT_THEME_THRESHOLD,
    DEFAULT_TOP_KEYWORDS,
};
pub use tokenizer::Tokenizer;
pub use vector::{TermVector, VectorModel};
