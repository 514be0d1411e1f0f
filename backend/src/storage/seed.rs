use super::Database;
use crate::auth::password::hash_password;
use crate::config::AdminSettings;
use common::model::template::TemplateDraft;
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
    #[error("cannot hash the administrator password: {0}")]
    Password(#[from] argon2::password_hash::Error),
}

const DEMO_TEMPLATES: [(&str, &str, &str); 3] = [
    (
        "Справка об обучении",
        "Официальная справка для студентов",
        "**СПРАВКА**

Настоящая справка выдана {{ ФИО_студента }} в том, что он(а) является студентом(кой) {{ факультет }} факультета {{ университет }} с {{ дата_поступления }} по настоящее время.

Курс: {{ курс }}
Форма обучения: {{ форма_обучения }}

Подпись: {{ подпись }}
",
    ),
    (
        "Благодарственное письмо",
        "Для преподавателей и сотрудников",
        "**БЛАГОДАРСТВЕННОЕ ПИСЬМО**

Выражаем искреннюю благодарность {{ ФИО }} за активное участие в организации {{ мероприятие }} и вклад в развитие образовательного процесса.

Желаем дальнейших успехов и профессионального роста!

{{ должность_подписи }}
{{ ФИО_подписи }}
{{ дата }}
",
    ),
    (
        "Приказ о зачислении",
        "Приказ ректора",
        "**ПРИКАЗ**

{{ университет }}
{{ дата }}

О зачислении

Зачислить на {{ курс }} курс {{ факультет }} факультета следующих студентов:

1. {{ ФИО_студента }}, {{ специальность }}

Основание: Приказ Минобрнауки №{{ номер_приказа }}

Ректор: {{ подпись_ректора }}
",
    ),
];

/// Creates the administrator when missing and adds the demo templates to an
/// empty template table. Safe to run on every start.
pub fn seed(db: &Database, admin: &AdminSettings) -> Result<(), SeedError> {
    if db.find_user(&admin.username)?.is_none() {
        db.create_user(&admin.username, &hash_password(&admin.password)?)?;
        info!("Created administrator account `{}`", admin.username);
    }

    if db.count_templates()? == 0 {
        for (name, description, text) in DEMO_TEMPLATES {
            db.create_template(&TemplateDraft {
                name: name.to_string(),
                description: description.to_string(),
                template_text: text.to_string(),
            })?;
        }
        info!("Added {} demo templates", DEMO_TEMPLATES.len());
    }
    Ok(())
}
