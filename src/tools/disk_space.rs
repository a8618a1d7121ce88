use log::debug;
use std::path::Path;
use sysinfo::Disks;

/// 查詢路徑所在磁碟的可用空間
///
/// 以掛載點最長前綴比對，找不到對應磁碟時回傳 `None`
#[must_use]
pub fn available_space(path: &Path) -> Option<u64> {
    let path = path.canonicalize().ok()?;
    let disks = Disks::new_with_refreshed_list();

    let disk = disks
        .list()
        .iter()
        .filter(|disk| path.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())?;

    debug!(
        "{} 位於 {}，可用 {} bytes",
        path.display(),
        disk.mount_point().display(),
        disk.available_space()
    );

    Some(disk.available_space())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_has_no_reading() {
        assert_eq!(
            available_space(Path::new("/definitely/not/a/real/path/osmo")),
            None
        );
    }
}
