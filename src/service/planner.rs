use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::warn;

use crate::config::config::CollisionPolicy;
use crate::models::plan::{Plan, RejectedSource};
use crate::models::task::{display_name, ConversionTask};
use crate::service::converter::{jpg_file_name, JPG_EXTENSION};

/// 為每個來源檔案建立轉換工作，並依策略處理輸出檔名衝突。
/// 來源先依路徑排序，衝突的解決結果因此是確定的。
/// 檔名比對不分大小寫，避免在不分大小寫的檔案系統上互相覆寫。
pub fn plan(mut sources: Vec<PathBuf>, destination_dir: &Path, policy: CollisionPolicy) -> Plan {
    sources.sort();

    let mut plan = Plan::default();
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    let mut used: HashSet<String> = sources
        .iter()
        .map(|s| jpg_file_name(s).to_lowercase())
        .collect();

    for source in sources {
        let name = jpg_file_name(&source);
        let Some(first) = claimed.get(&name.to_lowercase()).cloned() else {
            claimed.insert(name.to_lowercase(), source.clone());
            plan.tasks
                .push(ConversionTask::new(source, destination_dir.to_path_buf(), name));
            continue;
        };

        match policy {
            CollisionPolicy::Report => {
                let reason = format!(
                    "輸出檔名衝突：{} 與 {} 都會寫入 {}",
                    display_name(&source),
                    display_name(&first),
                    name
                );
                warn!("{}", reason);
                plan.rejected.push(RejectedSource {
                    source_path: source,
                    reason,
                });
            }
            CollisionPolicy::Overwrite => {
                warn!(
                    "輸出檔名衝突：{} 將覆寫 {} 的輸出 {}",
                    display_name(&source),
                    display_name(&first),
                    name
                );
                plan.tasks
                    .push(ConversionTask::new(source, destination_dir.to_path_buf(), name));
            }
            CollisionPolicy::Suffix => {
                let renamed = next_free_name(&source, &used);
                warn!(
                    "輸出檔名衝突：{} 改寫入 {}",
                    display_name(&source),
                    renamed
                );
                used.insert(renamed.to_lowercase());
                claimed.insert(renamed.to_lowercase(), source.clone());
                plan.tasks
                    .push(ConversionTask::new(source, destination_dir.to_path_buf(), renamed));
            }
        }
    }
    plan
}

fn next_free_name(source: &Path, used: &HashSet<String>) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    (1..)
        .map(|i| format!("{}_{}.{}", stem, i, JPG_EXTENSION))
        .find(|candidate| !used.contains(&candidate.to_lowercase()))
        .unwrap_or_else(|| format!("{}.{}", stem, JPG_EXTENSION))
}
