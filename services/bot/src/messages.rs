//! services/bot/src/messages.rs
//!
//! The user-facing message table (Ukrainian) and the mapping from the
//! survey machine's symbolic prompts to rendered text plus reply keyboards.

use stylist_core::domain::{Keyboard, StyleProfile};
use stylist_core::survey::PromptKind;

// --- Registration flow ---
pub const GREETING: &str =
    "Вітаю! Натисніть кнопку, щоб поділитися номером.\nЯкщо ви у веб-версії, введіть свій номер у повідомленні.";
pub const SHARE_PHONE_BUTTON: &str = "📲 Надіслати номер";
pub const ENTER_PHONE: &str = "Будь ласка, введіть ваш номер телефону (наприклад, 0971234567).";
pub const REGISTRATION_THANKS: &str = "🎉 Дякуємо за реєстрацію! Зараз заповнімо анкету.";
pub const REGISTRATION_ERROR: &str = "Виникла помилка при реєстрації, спробуйте ще раз.";
pub const ALREADY_REGISTERED: &str = "🔓 Ви вже зареєстровані та анкету заповнили!";
pub const REGISTERED_NOT_SURVEYED: &str = "Ви вже зареєстровані, але анкету не заповнили.";
pub const START_SURVEY_HINT: &str = "Будь ласка, введіть /start_survey, щоб почати анкету.";
pub const NOT_REGISTERED: &str = "Спершу зареєструйтеся: надішліть /start і поділіться номером.";

// --- Survey flow ---
pub const SELECT_CLOTHING_SIZE: &str = "Оберіть ваш розмір одягу:";
pub const INVALID_CLOTHING_SIZE: &str = "Будь ласка, оберіть розмір зі списку: XS, S, M, L, XL, XXL.";
pub const SELECT_FASHION_STYLE: &str = "Оберіть ваш улюблений стиль:";
pub const INVALID_FASHION_STYLE: &str =
    "Будь ласка, оберіть стиль зі списку: Casual, Smart Casual, Classic, Sporty.";
pub const PREFERRED_COLORS: &str = "Які кольори ви уникаєте в одязі?";
pub const FAVORITE_BRANDS: &str = "Які ваші улюблені бренди?";
pub const HEIGHT_QUESTION: &str = "Вкажіть ваш зріст:";
pub const WEIGHT_QUESTION: &str = "Вкажіть вашу вагу:";
pub const SELECT_GENDER: &str = "Оберіть вашу стать:";
pub const MALE: &str = "Чоловіча";
pub const FEMALE: &str = "Жіноча";
pub const CONFIRM: &str = "Підтверджую";
pub const CANCEL: &str = "Скасувати";
pub const YES: &str = "Так";
pub const NO: &str = "Ні";
pub const SURVEY_SAVED: &str =
    "✅ Анкету збережено! Бажаєте завантажити фото вашого гардеробу?";
pub const SURVEY_CANCELLED: &str = "Анкету скасовано.";

// --- Wardrobe flow ---
pub const SEND_WARDROBE_PHOTOS: &str =
    "Надішліть фото речей з вашого гардеробу. Коли закінчите, напишіть «Готово».";
pub const UPLOAD_SKIPPED: &str = "Гаразд! Ви завжди можете надіслати фото пізніше.";
pub const WARDROBE_UPLOADED: &str = "👕 Гардероб збережено, дякуємо!";
pub const PHOTO_PROCESSING: &str = "Обробляю фото, зачекайте хвилинку...";
pub const PHOTO_SAVED: &str = "📸 Фото збережено у вашому гардеробі!";
pub const ERROR_PHOTO_UPLOAD: &str = "Не вдалося зберегти фото, спробуйте ще раз.";

// --- Chat flow ---
pub const AI_ERROR: &str = "Вибачте, зараз я не можу відповісти. Спробуйте трохи пізніше. 🙏";
pub const GENERIC_ERROR: &str = "Щось пішло не так, спробуйте ще раз.";
pub const OUTFIT_NOT_FOUND: &str =
    "На жаль, я не зміг підібрати образ з вашого гардеробу. Спробуйте додати більше речей!";

/// Renders a symbolic survey prompt into outbound text and an optional
/// reply keyboard.
pub fn render(prompt: &PromptKind) -> (String, Option<Keyboard>) {
    match prompt {
        PromptKind::AskSize => (
            SELECT_CLOTHING_SIZE.to_string(),
            Some(Keyboard::reply(&[&["XS", "S", "M"], &["L", "XL", "XXL"]])),
        ),
        PromptKind::InvalidSize => (INVALID_CLOTHING_SIZE.to_string(), None),
        PromptKind::AskStyle => (
            SELECT_FASHION_STYLE.to_string(),
            Some(Keyboard::reply(&[
                &["Casual", "Smart Casual"],
                &["Classic", "Sporty"],
            ])),
        ),
        PromptKind::InvalidStyle => (INVALID_FASHION_STYLE.to_string(), None),
        PromptKind::AskColors => (PREFERRED_COLORS.to_string(), None),
        PromptKind::AskBrands => (FAVORITE_BRANDS.to_string(), None),
        PromptKind::AskHeight => (HEIGHT_QUESTION.to_string(), None),
        PromptKind::AskWeight => (WEIGHT_QUESTION.to_string(), None),
        PromptKind::AskGender => (
            SELECT_GENDER.to_string(),
            Some(Keyboard::reply(&[&[MALE, FEMALE]])),
        ),
        PromptKind::Summary(profile) => (
            summary_text(profile),
            Some(Keyboard::reply(&[&[CONFIRM, CANCEL]])),
        ),
        PromptKind::SurveySaved => (
            SURVEY_SAVED.to_string(),
            Some(Keyboard::reply(&[&[YES, NO]])),
        ),
        PromptKind::SurveyCancelled => (SURVEY_CANCELLED.to_string(), Some(Keyboard::Remove)),
        PromptKind::SendPhotos => (SEND_WARDROBE_PHOTOS.to_string(), Some(Keyboard::Remove)),
        PromptKind::UploadSkipped => (UPLOAD_SKIPPED.to_string(), Some(Keyboard::Remove)),
        PromptKind::WardrobeDone => (WARDROBE_UPLOADED.to_string(), Some(Keyboard::Remove)),
    }
}

fn summary_text(profile: &StyleProfile) -> String {
    format!(
        "📋 Перевірте вашу анкету:\n\
         • 📏 Розмір: {}\n\
         • 👗 Стиль: {}\n\
         • 🎨 Небажані кольори: {}\n\
         • 🛍 Бренди: {}\n\
         • 📏 Зріст: {}\n\
         • ⚖ Вага: {}\n\
         • 👤 Стать: {}\n\n\
         Все вірно?\nВведіть або оберіть: {}, {}",
        profile.size,
        profile.style,
        profile.colors,
        profile.brands,
        profile.height,
        profile.weight,
        profile.gender,
        CONFIRM,
        CANCEL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_includes_every_answer() {
        let profile = StyleProfile {
            size: "M".into(),
            style: "Casual".into(),
            colors: "no red".into(),
            brands: "Nike".into(),
            height: "180".into(),
            weight: "75".into(),
            gender: "male".into(),
        };
        let (text, keyboard) = render(&PromptKind::Summary(profile));
        for needle in ["M", "Casual", "no red", "Nike", "180", "75", "male"] {
            assert!(text.contains(needle), "summary is missing '{needle}'");
        }
        assert!(matches!(keyboard, Some(Keyboard::Reply { .. })));
    }

    #[test]
    fn size_prompt_carries_a_keyboard() {
        let (_, keyboard) = render(&PromptKind::AskSize);
        match keyboard {
            Some(Keyboard::Reply { rows }) => assert_eq!(rows.len(), 2),
            other => panic!("expected a reply keyboard, got {other:?}"),
        }
    }
}
