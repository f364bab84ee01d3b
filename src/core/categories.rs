use serde::Serialize;

/// An offer/channel topic with the keywords used for category matching
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub key: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

/// Fixed taxonomy exposed to the Mini App for category pickers
pub static CATEGORIES: [Category; 10] = [
    Category {
        key: "tech",
        name: "Технологии",
        emoji: "💻",
        description: "IT, гаджеты, программирование",
        keywords: &["технология", "it", "программирование", "гаджет", "стартап"],
    },
    Category {
        key: "business",
        name: "Бизнес",
        emoji: "💼",
        description: "Предпринимательство, инвестиции, маркетинг",
        keywords: &["бизнес", "предприниматель", "инвестиции", "маркетинг", "продажи"],
    },
    Category {
        key: "lifestyle",
        name: "Лайфстайл",
        emoji: "✨",
        description: "Образ жизни, мотивация, саморазвитие",
        keywords: &["лайфстайл", "образ жизни", "мотивация", "саморазвитие", "отношения"],
    },
    Category {
        key: "entertainment",
        name: "Развлечения",
        emoji: "🎬",
        description: "Юмор, кино, музыка, мемы",
        keywords: &["развлечения", "юмор", "мемы", "кино", "музыка"],
    },
    Category {
        key: "education",
        name: "Образование",
        emoji: "📚",
        description: "Обучение, курсы, наука",
        keywords: &["образование", "обучение", "курсы", "наука", "знания"],
    },
    Category {
        key: "health",
        name: "Здоровье",
        emoji: "🏃",
        description: "Спорт, фитнес, правильное питание",
        keywords: &["здоровье", "спорт", "фитнес", "питание", "медицина"],
    },
    Category {
        key: "travel",
        name: "Путешествия",
        emoji: "✈️",
        description: "Туризм, страны, отдых",
        keywords: &["путешествия", "туризм", "отдых", "страны", "отели"],
    },
    Category {
        key: "food",
        name: "Еда",
        emoji: "🍕",
        description: "Рецепты, рестораны, кулинария",
        keywords: &["еда", "рецепты", "кулинария", "ресторан", "готовка"],
    },
    Category {
        key: "fashion",
        name: "Мода",
        emoji: "👗",
        description: "Стиль, одежда, красота",
        keywords: &["мода", "стиль", "одежда", "красота", "тренды"],
    },
    Category {
        key: "crypto",
        name: "Криптовалюты",
        emoji: "₿",
        description: "Биткоин, блокчейн, DeFi",
        keywords: &["криптовалют", "биткоин", "блокчейн", "crypto", "defi"],
    },
];

/// Find a category by key, ignoring case and surrounding whitespace
pub fn find_category(key: &str) -> Option<&'static Category> {
    let key = key.trim();
    CATEGORIES.iter().find(|c| c.key.eq_ignore_ascii_case(key))
}

pub fn all_categories() -> Vec<&'static Category> {
    CATEGORIES.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_has_ten_unique_keys() {
        let mut keys: Vec<_> = CATEGORIES.iter().map(|c| c.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn keywords_are_lowercase() {
        for category in CATEGORIES.iter() {
            assert!(!category.keywords.is_empty());
            for keyword in category.keywords {
                assert_eq!(*keyword, keyword.to_lowercase(), "{}", category.key);
            }
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(find_category(" Tech ").map(|c| c.key), Some("tech"));
        assert!(find_category("gardening").is_none());
    }
}
