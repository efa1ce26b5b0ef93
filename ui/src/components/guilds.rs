use payloads::{requests, responses::Guild};
use yew::prelude::*;

use super::GuildRanks;
use crate::hooks::use_fetch;
use crate::utils::by_key;

fn by_name(guilds: &[Guild]) -> Vec<Guild> {
    let mut guilds = guilds.to_vec();
    guilds.sort_by(by_key(|guild: &Guild| guild.name.clone()));
    guilds
}

/// Every guild shared with the bot, by name, each with its ranks.
#[function_component]
pub fn Guilds() -> Html {
    let guilds = use_fetch::<Vec<Guild>>(requests::guilds());

    guilds.render("Server", |guilds| {
        if guilds.is_empty() {
            return html! {
                <p class="uk-text-muted">
                    {"You don't share any servers with the bot yet."}
                </p>
            };
        }

        html! {
            <div>
                { for by_name(guilds).into_iter().map(|guild| {
                    let key = guild.id.to_string();
                    html! { <GuildRanks key={key} {guild} /> }
                }) }
            </div>
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild(id: &str, name: &str) -> Guild {
        Guild {
            id: id.into(),
            name: name.into(),
            icon: None,
            admin: false,
        }
    }

    #[test]
    fn guilds_are_listed_by_name() {
        let guilds = vec![
            guild("1", "pony hangout"),
            guild("2", "Cafe"),
            guild("3", "Écurie"),
        ];
        let names: Vec<_> = by_name(&guilds)
            .into_iter()
            .map(|guild| guild.name)
            .collect();
        assert_eq!(names, vec!["Cafe", "Écurie", "pony hangout"]);
        // the fetched list itself is left alone
        assert_eq!(guilds[0].name, "pony hangout");
    }
}
