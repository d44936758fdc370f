use crate::error::AppResult;
use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("actors.html", include_str!("../templates/actors.html")),
    ("actor_form.html", include_str!("../templates/actor_form.html")),
    ("staffs.html", include_str!("../templates/staffs.html")),
    ("categories.html", include_str!("../templates/categories.html")),
    ("category_form.html", include_str!("../templates/category_form.html")),
    ("films.html", include_str!("../templates/films.html")),
    ("film_form.html", include_str!("../templates/film_form.html")),
    ("customers.html", include_str!("../templates/customers.html")),
    ("customer_form.html", include_str!("../templates/customer_form.html")),
    ("confirm_delete.html", include_str!("../templates/confirm_delete.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// Page templates compiled into the binary. `.html` names are autoescaped.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, name: &str, ctx: impl Serialize) -> AppResult<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn every_template_compiles() {
        let templates = Templates::new().unwrap();
        for (name, _) in TEMPLATES {
            assert!(templates.env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn values_are_escaped() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates
            .render(
                "actors.html",
                context! {
                    actors => vec![context! {
                        actor_id => 1,
                        first_name => "<b>PENELOPE</b>",
                        last_name => "GUINESS",
                    }],
                    search => context! {},
                },
            )
            .unwrap();
        assert!(page.contains("&lt;b&gt;PENELOPE&lt;&#x2f;b&gt;"));
        assert!(!page.contains("<b>PENELOPE</b>"));
    }

    #[test]
    fn delete_confirmation_names_target() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates
            .render(
                "confirm_delete.html",
                context! {
                    title => "Delete film",
                    label => "ACADEMY DINOSAUR",
                    action => "/films/1/delete",
                    back => "/films",
                },
            )
            .unwrap();
        assert!(page.contains("ACADEMY DINOSAUR"));
        assert!(page.contains("<form method=\"post\""));
    }
}
