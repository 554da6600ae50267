//! The navigation bar shown at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{APP_NAME, BADGE_STYLE},
    viewer::Role,
};

/// The navigation bar with the identity of the current caller.
pub struct NavBar<'a> {
    /// The caller's email, if they gave one.
    pub email: Option<&'a str>,
    /// The caller's role.
    pub role: Role,
}

impl NavBar<'_> {
    pub fn into_html(self) -> Markup {
        let role_badge_colour = match self.role {
            Role::Admin => "text-purple-800 bg-purple-100 dark:bg-purple-900 dark:text-purple-300",
            Role::Viewer => "text-blue-800 bg-blue-100 dark:bg-blue-900 dark:text-blue-300",
        };

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            (APP_NAME)
                        }
                    }

                    div
                        id="identity"
                        class="flex flex-wrap items-center gap-3 text-sm text-gray-700 dark:text-gray-300"
                    {
                        @if let Some(email) = self.email
                        {
                            span id="identity-email" class="truncate max-w-[16rem]" { (email) }
                        }

                        span
                            id="identity-role"
                            class={ (BADGE_STYLE) " " (role_badge_colour) }
                        {
                            (self.role)
                        }

                        a
                            href=(endpoints::DASHBOARD_VIEW)
                            class="text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400 underline"
                        {
                            "Switch user"
                        }
                    }
                }
            }
        )
    }
}
