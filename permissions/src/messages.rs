//! Texts shown by the permission screens.

/// Toast after at least one permission was approved.
pub const APPROVED: &str = "Approved";

/// Toast after every permission was rejected.
pub const REJECTED: &str = "Rejected";

/// Toast after the user backs out of the request.
pub const PERMISSION_CANCELLED: &str = "Permission request cancelled";

/// Toast on handheld devices, where the system dialog opens on the phone.
pub const PHONE_SCREEN_GUIDANCE: &str = "Grant the permission on your phone screen";

/// Body when the manifest cannot be read.
pub const PACKAGE_NOT_FOUND: &str = "Package not found";

/// Body when nothing is missing.
pub const ALREADY_GRANTED: &str = "All permissions are already granted";

/// Title of the request screen.
pub const ENABLE_PERMISSION_TITLE: &str = "Enable permissions";

/// Body of the request screen.
pub const REQUEST_PERMISSION_MESSAGE: &str =
    "This app needs access to your location to show nearby places and weather";

/// Title of the home screen.
pub const HOME_TITLE: &str = "Templates";
