pub const SCREEN_7INCH: (i32, i32) = (800, 480);       // Official Raspberry Pi touch display
pub const SCREEN_10INCH: (i32, i32) = (1280, 800);
pub const SCREEN_15INCH: (i32, i32) = (1920, 1080);

pub const PICTURE_FPS: u32 = 60;                      // Tick rate while showing a photo
pub const VIDEO_FPS: u32 = 30;                        // Tick rate while playing a video

pub const ZOOM_DURATION: f64 = 10.0;                  // Duration of the slow zoom (seconds)
pub const ZOOM_GAIN: f64 = 0.1;                       // Growth over the whole zoom (10%)
pub const TRANSLATE_DURATION: f64 = 10.0;             // Duration of the pan (seconds)
pub const TRANSLATE_OVERSCALE: f64 = 1.2;             // Pre-scale that leaves room to pan

pub const UI_HIDE_AFTER: f64 = 5.0;                   // Control UI auto-hide delay (seconds)
pub const RIGHT_TAP_AREA: f64 = 1.0 / 6.0;            // Fraction of the width that means "next"
pub const TAP_AREA_ALPHA: u8 = 128;

pub const SPLASH_DURATION: f64 = 3.0;                 // Splash fully opaque (seconds)
pub const SPLASH_FADE: f64 = 1.0;                     // Splash fade-out (seconds)

// First-run onboarding, every value is an offset from the overlay start (seconds)
pub const ONBOARDING_CAPTION_OFFSETS: [f64; 3] = [0.5, 2.0, 3.5];
pub const ONBOARDING_CAPTIONS_FADE_START: f64 = 6.5;
pub const ONBOARDING_CAPTIONS_FADE: f64 = 1.0;
pub const ONBOARDING_MESSAGE_HOLD: f64 = 3.0;
pub const ONBOARDING_MESSAGE_FADE: f64 = 1.0;

pub const ONBOARDING_CAPTIONS: [&str; 3] = [
    "Tap the right edge to skip ahead",
    "Tap the bottom of the screen to show the controls",
    "Press Esc to leave the frame",
];
pub const ONBOARDING_MESSAGE: &str = "Enjoy your photos";

pub const ICON_PLAY: &str = "play";
pub const ICON_PAUSE: &str = "pause";
pub const ICON_SKIP: &str = "skip";
pub const ICON_NAMES: [&str; 3] = [ICON_PLAY, ICON_PAUSE, ICON_SKIP];

pub const UI_FONT_SIZE: i32 = 24;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "avi", "mov"];
