//! User-facing strings.

use crate::config::Locale;

/// Localised status and alert texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    /// Messages for `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// The locale in use.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Status after some added files were not PDFs.
    pub fn non_pdf_ignored(&self, count: usize) -> String {
        match self.locale {
            Locale::Ja => format!("PDF以外 {count} 件は無視しました"),
            Locale::En => format!("Ignored {count} non-PDF file(s)"),
        }
    }

    /// Status while a merge is running.
    pub fn merging(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "結合中…",
            Locale::En => "Merging…",
        }
    }

    /// Status after a fully successful merge.
    pub fn done(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "完了",
            Locale::En => "Done",
        }
    }

    /// Status after a merge that skipped `count` files.
    pub fn done_with_skips(&self, count: usize) -> String {
        match self.locale {
            Locale::Ja => format!("完了（一部スキップ: {count} 件）"),
            Locale::En => format!("Done ({count} file(s) skipped)"),
        }
    }

    /// Status after a merge that produced nothing.
    pub fn failed(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "失敗しました",
            Locale::En => "Failed",
        }
    }

    /// Alert listing the files that could not be read.
    pub fn skipped_files_alert<S: AsRef<str>>(&self, names: &[S]) -> String {
        let header = match self.locale {
            Locale::Ja => "読み込みに失敗したファイル:",
            Locale::En => "Files that could not be read:",
        };
        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        format!("{header}\n{}", names.join("\n"))
    }

    /// Alert when no file could be read.
    pub fn all_failed_alert(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "すべてのPDFの読み込みに失敗しました（暗号化/破損/サイズ過大など）",
            Locale::En => "None of the PDFs could be read (encrypted, corrupted, too large, ...)",
        }
    }

    /// Alert when the merge aborted.
    pub fn fatal_alert(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "結合に失敗しました（暗号化/破損/サイズ過大など）",
            Locale::En => "Merging failed (encrypted, corrupted, too large, ...)",
        }
    }

    /// Status when the PDF engine cannot be used.
    pub fn engine_missing(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "PDFエンジンが読み込まれていません",
            Locale::En => "PDF engine is not available",
        }
    }

    /// Shown once the output has been delivered.
    pub fn saved(&self, file_name: &str) -> String {
        match self.locale {
            Locale::Ja => format!("保存しました: {file_name}"),
            Locale::En => format!("Saved {file_name}"),
        }
    }

    /// Shown when the list is empty.
    pub fn empty_list(&self) -> &'static str {
        match self.locale {
            Locale::Ja => "ファイルが選択されていません",
            Locale::En => "No files selected",
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}
