use crate::model::ActionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAction {
    pub id: ActionId,
    pub label: &'static str,
    pub icon: &'static str,
}

pub fn static_actions() -> &'static [StaticAction] {
    &[
        StaticAction {
            id: ActionId::Quit,
            label: "Quit",
            icon: "gtk-quit",
        },
        StaticAction {
            id: ActionId::AddBuddy,
            label: "Add Buddy",
            icon: "pidgin-add-buddy",
        },
        StaticAction {
            id: ActionId::Accounts,
            label: "Accounts",
            icon: "pidgin-accounts",
        },
        StaticAction {
            id: ActionId::Preferences,
            label: "Preferences",
            icon: "gtk-preferences",
        },
        StaticAction {
            id: ActionId::Plugins,
            label: "Plugins",
            icon: "pidgin-plugins",
        },
    ]
}

pub fn find_action(id: ActionId) -> Option<&'static StaticAction> {
    static_actions().iter().find(|action| action.id == id)
}
