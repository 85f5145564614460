//! 報告書の生成（構造調整・データ書き込み）

pub mod anchors;
pub mod assemble;
pub mod layout;
pub mod narrative;
pub mod reconcile;

pub use assemble::{assemble, AssemblyOptions, AssemblySummary};
pub use layout::DocumentLayout;
pub use reconcile::{reconcile, reconcile_file, ReconcileReport};
