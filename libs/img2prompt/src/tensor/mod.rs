mod utils;

pub use utils::{
    base64_to_tensor, encode_png, image_to_tensor, load_image_tensor, tensor_to_image,
    tensor_to_png_base64, TensorError,
};
