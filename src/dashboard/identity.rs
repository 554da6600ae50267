//! The form asking a caller who they are before showing the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        APP_NAME, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    viewer::Role,
};

/// Renders the identity form page.
///
/// `email` pre-fills the email field and `error_message` is shown below it.
pub(super) fn identity_view(role: Role, email: &str, error_message: Option<&str>) -> Markup {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mt-8 mb-6 text-2xl font-semibold" { (APP_NAME) }

            div class="w-full bg-white rounded-lg shadow dark:border dark:bg-gray-800 dark:border-gray-700"
            {
                form
                    id="identity-form"
                    method="get"
                    action=(endpoints::DASHBOARD_VIEW)
                    class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h2 class="text-xl font-bold leading-tight tracking-tight md:text-2xl"
                    {
                        "Who are you?"
                    }

                    div
                    {
                        label for="role" class=(FORM_LABEL_STYLE) { "Role" }

                        select id="role" name="role" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for choice in [Role::Viewer, Role::Admin] {
                                option value=(choice.as_query_value()) selected[choice == role]
                                {
                                    (choice)
                                }
                            }
                        }
                    }

                    div
                    {
                        label for="user_email" class=(FORM_LABEL_STYLE) { "Email" }

                        input
                            type="email"
                            id="user_email"
                            name="user_email"
                            placeholder="you@example.com"
                            value=(email)
                            class=(FORM_TEXT_INPUT_STYLE);

                        p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                        {
                            "Viewers only see their own transactions. Admins see every transaction."
                        }

                        @if let Some(error_message) = error_message
                        {
                            p id="identity-error" class="text-red-500 text-base" { (error_message) }
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "View dashboard" }
                }
            }
        }
    };

    base("Sign In", &[], &content)
}
