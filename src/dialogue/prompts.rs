use crate::models::choices::{CANCEL_LABEL, OTHER_TIME_LABEL};
use crate::models::schedule::sorted_for_display;
use crate::models::{ClassDay, ClassTime, ConfirmAction, ScheduleEntry};

/// Что сделать с клавиатурой ответа
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    Keep,
    Remove,
    /// Одноразовая клавиатура: строки кнопок
    Buttons(Vec<Vec<String>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Keep,
        }
    }

    pub fn with_buttons(text: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Buttons(rows),
        }
    }

    pub fn removing_keyboard(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Remove,
        }
    }
}

pub const WELCOME: &str = "👋 مرحباً بك في بوت \"منظمي\"!\n\n\
📚 أنا هنا علشان أساعدك ترتب جدولك الدراسي، أذكّرك بحصصك، وأخليك تركز على أهدافك!\n\n\
🛠 المزايا:\n\
- إضافة حصص وتنظيم الجدول.\n\
- تنبيهات تلقائية قبل الحصة بعشر دقائق.\n\
- عرض مرتب حسب الأيام والأوقات.\n\
- حذف الحصص بسهولة.\n\n\
📋 الأوامر:\n\
/start – بدء إضافة الحصص\n\
/جدولي – عرض جدولك\n\
/حذف – حذف حصة";

pub const HELP: &str = "📋 الأوامر المتاحة:\n\n\
/start – بدء إضافة الحصص\n\
/جدولي – عرض جدولك الدراسي\n\
/حذف – حذف حصة من الجدول\n\
/help – عرض هذه المساعدة";

pub const START_HINT: &str = "اكتب /start للبدء.";
pub const ASK_SUBJECT: &str = "✏️ اكتب اسم الحصة (مثلاً: رياضيات، لغة إنجليزية، إلخ):";
pub const EMPTY_SUBJECT: &str = "❗ اكتب اسم الحصة، لا تتركها فارغة.";
pub const ASK_CUSTOM_TIME: &str = "⌨️ اكتب وقت الحصة (مثلاً: 08:30):";
pub const BAD_CUSTOM_TIME: &str =
    "❗ الصيغة غير صحيحة أو الوقت خارج النطاق 08:00 - 17:00. حاول مثلاً: 08:30";
pub const CHOOSE_FROM_BUTTONS: &str = "اختر من الأزرار:";
pub const NOTHING_TO_DELETE: &str = "📭 جدولك فارغ، ما فيه شي تحذفه.";
pub const EMPTY_SCHEDULE: &str = "📭 جدولك فارغ.";
pub const DELETE_CANCELLED: &str = "تم إلغاء الحذف.";
pub const BAD_POSITION: &str = "❗ رقم الحصة غير صحيح، حاول مرة ثانية.";
pub const NOT_A_POSITION: &str = "❗ اكتب رقم الحصة للحذف.";
pub const SAVE_FAILED: &str = "⚠️ تعذّر حفظ الجدول حالياً، حاول مرة ثانية بعد قليل.";

pub fn day_prompt() -> Reply {
    let rows = ClassDay::ALL
        .iter()
        .map(|day| vec![day.label().to_string()])
        .collect();
    Reply::with_buttons("📅 اختر اليوم:", rows)
}

pub fn time_prompt() -> Reply {
    let mut rows: Vec<Vec<String>> = ClassTime::hourly_slots()
        .iter()
        .map(|slot| vec![slot.to_string()])
        .collect();
    rows.push(vec![OTHER_TIME_LABEL.to_string()]);
    Reply::with_buttons("⏰ اختر وقت الحصة:", rows)
}

pub fn confirm_buttons() -> Vec<Vec<String>> {
    vec![ConfirmAction::ALL
        .iter()
        .map(|action| action.label().to_string())
        .collect()]
}

pub fn confirm_menu() -> Reply {
    Reply::with_buttons(CHOOSE_FROM_BUTTONS, confirm_buttons())
}

pub fn entry_added(entry: &ScheduleEntry) -> Reply {
    Reply::with_buttons(format!("✅ تم إضافة: {}", entry.describe()), confirm_buttons())
}

/// Меню удаления строится по порядку хранения, а не отображения
pub fn delete_menu(entries: &[ScheduleEntry]) -> Reply {
    let mut rows: Vec<Vec<String>> = (1..=entries.len())
        .map(|position| vec![position.to_string()])
        .collect();
    rows.push(vec![CANCEL_LABEL.to_string()]);
    Reply::with_buttons("📋 اختر رقم الحصة اللي تبي تحذفها:", rows)
}

pub fn entry_removed(entry: &ScheduleEntry) -> Reply {
    Reply::removing_keyboard(format!("🗑️ حُذفت الحصة: {}", entry.describe()))
}

pub fn schedule(entries: &[ScheduleEntry]) -> Reply {
    if entries.is_empty() {
        return Reply::text(EMPTY_SCHEDULE);
    }

    let mut text = String::from("📚 جدولك الدراسي:\n\n");
    for (idx, entry) in sorted_for_display(entries).iter().enumerate() {
        text.push_str(&format!("{}. {}\n", idx + 1, entry.describe()));
    }
    Reply::text(text)
}

pub fn reminder(entry: &ScheduleEntry) -> String {
    format!("🔔 تذكير: عندك حصة {} الساعة {}", entry.subject, entry.time)
}
