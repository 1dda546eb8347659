//! Static titles for the fifteen chapters of the Daejonggyeong.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Display title of one chapter, in hangul and hanja forms.
#[derive(Clone, Copy, Debug)]
pub struct ChapterTitle {
    pub title: &'static str,
    pub hanja: &'static str,
}

static CHAPTER_TITLES: Lazy<BTreeMap<&'static str, ChapterTitle>> = Lazy::new(|| {
    [
        ("1장 서품", ChapterTitle { title: "서품", hanja: "序品" }),
        ("2장 교의품", ChapterTitle { title: "교의품", hanja: "教義品" }),
        ("3장 수행품", ChapterTitle { title: "수행품", hanja: "修行品" }),
        ("4장 인도품", ChapterTitle { title: "인도품", hanja: "人道品" }),
        ("5장 인과품", ChapterTitle { title: "인과품", hanja: "因果品" }),
        ("6장 변의품", ChapterTitle { title: "변의품", hanja: "辨疑品" }),
        ("7장 성리품", ChapterTitle { title: "성리품", hanja: "性理品" }),
        ("8장 불지품", ChapterTitle { title: "불지품", hanja: "佛智品" }),
        ("9장 천도품", ChapterTitle { title: "천도품", hanja: "天道品" }),
        ("10장 신성품", ChapterTitle { title: "신성품", hanja: "神聖品" }),
        ("11장 요훈품", ChapterTitle { title: "요훈품", hanja: "要訓品" }),
        ("12장 실시품", ChapterTitle { title: "실시품", hanja: "實施品" }),
        ("13장 교단품", ChapterTitle { title: "교단품", hanja: "敎團品" }),
        ("14장 전망품", ChapterTitle { title: "전망품", hanja: "展望品" }),
        ("15장 부촉품", ChapterTitle { title: "부촉품", hanja: "付囑品" }),
    ]
    .into_iter()
    .collect()
});

pub fn get(chapter_key: &str) -> Option<&'static ChapterTitle> {
    CHAPTER_TITLES.get(chapter_key)
}

/// The chapter number text preceding `장` in a chapter key,
/// e.g. `"1장 서품"` → `"1"`.
pub fn chapter_number(chapter_key: &str) -> &str {
    chapter_key.split('장').next().unwrap_or("").trim()
}

/// Heading shown on the root page: `제1 서품(序品)`.
pub fn full_title(chapter_key: &str) -> Option<String> {
    let chapter = get(chapter_key)?;
    Some(format!("제{num} {title}({hanja})",
                 num = chapter_number(chapter_key),
                 title = chapter.title,
                 hanja = chapter.hanja))
}

/// One-sentence description placed under the heading.
pub fn description(chapter_key: &str) -> Option<String> {
    let chapter = get(chapter_key)?;
    Some(format!("대종경의 {num} 번째 장으로, {title}({hanja})에 관한 내용을 담고 있습니다.",
                 num = chapter_number(chapter_key),
                 title = chapter.title,
                 hanja = chapter.hanja))
}

/// Title of the per-chapter database: the full title plus `데이터베이스`.
pub fn database_title(chapter_key: &str) -> Option<String> {
    Some(format!("{} 데이터베이스", full_title(chapter_key)?))
}
