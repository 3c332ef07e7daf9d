//! Comment texts posted by the gate

use crate::merge::GatedAction;

pub fn label_added(label: &str, by: &str) -> String {
    format!(
        "***{label}*** was added to this pull request by: ***{by}***. :wave: \n\
         **NOTE:** If you find this pull request unmerged while all conditions meet, \
         you are encouraged to use command: \"/check-pr\" to try it again. :smile: "
    )
}

pub fn label_removed(label: &str, by: &str) -> String {
    format!("***{label}*** was removed in this pull request by: ***{by}***. :flushed: ")
}

pub fn no_permission(login: &str, action: GatedAction, label: &str) -> String {
    let verb = match action {
        GatedAction::AddApproved | GatedAction::AddLgtm => "add",
        GatedAction::RemoveApproved | GatedAction::RemoveLgtm => "remove",
    };
    format!(
        "***{login}*** has no permission to {verb} ***{label}*** in this pull request. :astonished:\n\
         please contact to the collaborators in this repository."
    )
}

pub fn self_lgtm(login: &str) -> String {
    format!("***{login}*** cannot add ***lgtm*** to their own pull request. :astonished:")
}

pub fn labels_stripped(labels: &[String], bot: &str) -> String {
    format!(
        "new changes are detected. ***{}*** is removed in this pull request by: ***{bot}***. :flushed: ",
        labels.join(",")
    )
}

pub fn merge_failed(reason: &str) -> String {
    format!(
        "The pull request merge failed: {reason}\n\
         please use command \"/check-pr\" to try again."
    )
}
