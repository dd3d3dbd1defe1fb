pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Sizes are shown in kilobytes with one decimal, like "0.5 KB" or "2048.0 KB".
    pub fn format_size(size: u64) -> String {
        format!("{:.1} KB", size as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_kilobytes() {
        assert_eq!(FileSizeUtils::format_size(0), "0.0 KB");
        assert_eq!(FileSizeUtils::format_size(512), "0.5 KB");
        assert_eq!(FileSizeUtils::format_size(1536), "1.5 KB");
        assert_eq!(FileSizeUtils::format_size(2 * 1024 * 1024), "2048.0 KB");
    }
}
