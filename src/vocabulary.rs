/*
 * src/vocabulary.rs
 * 単語データ (WordEntry) と単語リストの読み込み
 */

use std::fs;
use std::path::PathBuf;

use rusqlite::{Connection, OpenFlags};
use serde::Deserialize;

use crate::error::VocabularyError;

/// 単語1件。作成後は変更しない
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordEntry {
    word: String,
    /// 画像のパスまたは URL (空なら画像なし)
    #[serde(default, alias = "image_url")]
    image: String,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            image: image.into(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn image_reference(&self) -> &str {
        &self.image
    }
}

/// セッション中は不変の単語リスト
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<WordEntry>,
}

impl Vocabulary {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordEntry> {
        self.entries.get(index)
    }
}

/// 組み込み単語 (硬い C / 柔らかい C / 両方)
struct BuiltinWord {
    word: &'static str,
    image: &'static str,
}

const BUILTIN_WORDS: &[BuiltinWord] = &[
    // 硬い C
    BuiltinWord { word: "cat", image: "" },
    BuiltinWord { word: "car", image: "" },
    BuiltinWord { word: "cup", image: "" },
    BuiltinWord { word: "cake", image: "" },
    BuiltinWord { word: "coat", image: "" },
    BuiltinWord { word: "clock", image: "" },
    BuiltinWord { word: "crab", image: "" },
    BuiltinWord { word: "music", image: "" },

    // 柔らかい C
    BuiltinWord { word: "city", image: "" },
    BuiltinWord { word: "cinema", image: "" },
    BuiltinWord { word: "cereal", image: "" },
    BuiltinWord { word: "pencil", image: "" },
    BuiltinWord { word: "mice", image: "" },
    BuiltinWord { word: "cycle", image: "" },

    // 両方
    BuiltinWord { word: "bicycle", image: "" },
    BuiltinWord { word: "circus", image: "" },
    BuiltinWord { word: "concert", image: "" },
    BuiltinWord { word: "cactus", image: "" },
];

/// 単語リストの供給元
pub trait VocabularyLoader {
    /// 表示用の名前 (ステータス行・ログ用)
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<WordEntry>, VocabularyError>;
}

/// 組み込みリストを返す
pub struct BuiltinLoader;

impl VocabularyLoader for BuiltinLoader {
    fn describe(&self) -> String {
        "built-in".to_string()
    }

    fn load(&self) -> Result<Vec<WordEntry>, VocabularyError> {
        Ok(BUILTIN_WORDS
            .iter()
            .map(|w| WordEntry::new(w.word, w.image))
            .collect())
    }
}

/// ファイルから読み込む
/// `.json` は `[{ "word": .., "image": .. }]`、それ以外は `word<TAB>image` の行形式
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl VocabularyLoader for FileLoader {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<WordEntry>, VocabularyError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| VocabularyError::Io {
            path: self.path.clone(),
            source,
        })?;

        let raw = if self.is_json() {
            serde_json::from_str::<Vec<WordEntry>>(&contents).map_err(|source| {
                VocabularyError::Json {
                    path: self.path.clone(),
                    source,
                }
            })?
        } else {
            parse_lines(&contents)
        };

        Ok(clean_entries(raw))
    }
}

/// SQLite の単語データベース (`Words` テーブルの `Word`, `ImageUrl` 列)
pub struct SqliteLoader {
    path: PathBuf,
}

const WORDS_QUERY: &str = "SELECT Word, ImageUrl FROM Words";

impl SqliteLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn query(&self) -> rusqlite::Result<Vec<WordEntry>> {
        // 読み取り専用で開く (ファイルがなければ作らずにエラー)
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stmt = conn.prepare(WORDS_QUERY)?;
        let rows = stmt.query_map([], |row| {
            let word: String = row.get(0)?;
            let image: Option<String> = row.get(1)?;
            Ok(WordEntry::new(word, image.unwrap_or_default()))
        })?;
        rows.collect()
    }
}

impl VocabularyLoader for SqliteLoader {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<WordEntry>, VocabularyError> {
        let raw = self.query().map_err(|source| VocabularyError::Sqlite {
            path: self.path.clone(),
            source,
        })?;
        Ok(clean_entries(raw))
    }
}

/// 拡張子で読み込み方を決める (`.db` / `.sqlite` / `.sqlite3` はデータベース)
pub fn loader_for_path(path: impl Into<PathBuf>) -> Box<dyn VocabularyLoader> {
    let path = path.into();
    let is_database = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["db", "sqlite", "sqlite3"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });
    if is_database {
        Box::new(SqliteLoader::new(path))
    } else {
        Box::new(FileLoader::new(path))
    }
}

/// `word<TAB>image` の行形式をパースする (空行と `#` 行は無視)
fn parse_lines(contents: &str) -> Vec<WordEntry> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|line| match line.split_once('\t') {
            Some((word, image)) => WordEntry::new(word, image.trim()),
            None => WordEntry::new(line, ""),
        })
        .collect()
}

/// 単語を trim し、空の単語は捨てる
fn clean_entries(raw: Vec<WordEntry>) -> Vec<WordEntry> {
    raw.into_iter()
        .filter_map(|entry| {
            let word = entry.word.trim();
            if word.is_empty() {
                tracing::warn!(image = %entry.image, "skipping entry with blank word");
                return None;
            }
            Some(WordEntry::new(word, entry.image))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn builtin_words_all_contain_c() {
        let words = BuiltinLoader.load().unwrap();
        assert!(!words.is_empty());
        assert!(words.iter().all(|w| w.word().to_lowercase().contains('c')));
    }

    #[test]
    fn loads_json_with_both_image_keys() {
        let file = write_temp(
            ".json",
            r#"[
                {"word": "cat", "image": "img/cat.png"},
                {"word": "city", "image_url": "https://example.org/city.jpg"},
                {"word": "cup"}
            ]"#,
        );
        let words = FileLoader::new(file.path()).load().unwrap();
        assert_eq!(
            words,
            vec![
                WordEntry::new("cat", "img/cat.png"),
                WordEntry::new("city", "https://example.org/city.jpg"),
                WordEntry::new("cup", ""),
            ]
        );
    }

    #[test]
    fn loads_tab_separated_lines() {
        let file = write_temp(".tsv", "# words\ncat\tcat.png\n\n  cinema  \nice\t\n");
        let words = FileLoader::new(file.path()).load().unwrap();
        assert_eq!(
            words,
            vec![
                WordEntry::new("cat", "cat.png"),
                WordEntry::new("cinema", ""),
                WordEntry::new("ice", ""),
            ]
        );
    }

    #[test]
    fn blank_words_are_skipped() {
        let file = write_temp(".json", r#"[{"word": "  ", "image": "x.png"}, {"word": " cat "}]"#);
        let words = FileLoader::new(file.path()).load().unwrap();
        assert_eq!(words, vec![WordEntry::new("cat", "")]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileLoader::new(dir.path().join("nope.json")).load().unwrap_err();
        assert!(matches!(err, VocabularyError::Io { .. }));
    }

    fn create_database(path: &std::path::Path, sql: &str) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(sql).unwrap();
    }

    #[test]
    fn loads_words_table_from_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.db");
        create_database(
            &path,
            "CREATE TABLE Words (Id INTEGER PRIMARY KEY, Word TEXT NOT NULL, ImageUrl TEXT);
             INSERT INTO Words (Word, ImageUrl) VALUES ('cat', 'https://example.org/cat.png');
             INSERT INTO Words (Word, ImageUrl) VALUES ('o''clock', '');
             INSERT INTO Words (Word, ImageUrl) VALUES ('city', NULL);
             INSERT INTO Words (Word, ImageUrl) VALUES ('   ', 'blank.png');",
        );

        let loader = loader_for_path(&path);
        assert_eq!(loader.describe(), path.display().to_string());
        assert_eq!(
            loader.load().unwrap(),
            vec![
                WordEntry::new("cat", "https://example.org/cat.png"),
                WordEntry::new("o'clock", ""),
                WordEntry::new("city", ""),
            ]
        );
    }

    #[test]
    fn database_without_words_table_is_sqlite_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.sqlite");
        create_database(&path, "CREATE TABLE Other (x TEXT);");
        let err = SqliteLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, VocabularyError::Sqlite { .. }));
    }

    #[test]
    fn missing_database_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let err = SqliteLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, VocabularyError::Sqlite { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn non_database_paths_use_file_loader() {
        let file = write_temp(".txt", "cactus\n");
        let words = loader_for_path(file.path()).load().unwrap();
        assert_eq!(words, vec![WordEntry::new("cactus", "")]);
    }

    #[test]
    fn broken_json_is_json_error() {
        let file = write_temp(".json", "[{\"word\": ");
        let err = FileLoader::new(file.path()).load().unwrap_err();
        assert!(matches!(err, VocabularyError::Json { .. }));
    }
}
