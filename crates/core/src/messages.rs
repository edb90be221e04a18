//! Vietnamese user-facing message catalog.
//!
//! Every error the API returns to a client carries a message from this
//! catalog. Handlers never format ad-hoc Vietnamese strings; they pick the
//! constant that matches the failure so wording stays consistent across
//! the storefront and the admin back-office.

// Generic / infrastructure
pub const INTERNAL: &str = "Đã xảy ra lỗi, vui lòng thử lại sau";
pub const DB_UNAVAILABLE: &str = "Không thể kết nối đến cơ sở dữ liệu";
pub const NOT_FOUND: &str = "Không tìm thấy dữ liệu yêu cầu";
pub const VALIDATION: &str = "Dữ liệu không hợp lệ";

// Authentication / authorization
pub const LOGIN_REQUIRED: &str = "Vui lòng đăng nhập để tiếp tục";
pub const SESSION_EXPIRED: &str = "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại";
pub const FORBIDDEN: &str = "Bạn không có quyền thực hiện thao tác này";
pub const INVALID_CREDENTIALS: &str = "Email hoặc mật khẩu không đúng";
pub const ACCOUNT_LOCKED: &str = "Tài khoản của bạn đã bị khóa";
pub const EMAIL_TAKEN: &str = "Email đã được sử dụng";
pub const EMAIL_INVALID: &str = "Địa chỉ email không hợp lệ";
pub const PASSWORD_TOO_SHORT: &str = "Mật khẩu phải có ít nhất 8 ký tự";
pub const PASSWORD_MISMATCH: &str = "Mật khẩu hiện tại không đúng";

// Catalog
pub const PRODUCT_NOT_FOUND: &str = "Không tìm thấy sản phẩm";
pub const PRODUCT_CODE_TAKEN: &str = "Mã sản phẩm đã tồn tại";
pub const PRODUCT_DISCONTINUED: &str = "Sản phẩm không còn kinh doanh";
pub const PRICE_NOT_POSITIVE: &str = "Giá sản phẩm phải lớn hơn 0";
pub const SLUG_TAKEN: &str = "Đường dẫn đã tồn tại, vui lòng chọn tên khác";
pub const BRAND_NOT_FOUND: &str = "Không tìm thấy thương hiệu";
pub const BRAND_IN_USE: &str = "Không thể xóa thương hiệu đang có sản phẩm";
pub const CATEGORY_NOT_FOUND: &str = "Không tìm thấy danh mục";
pub const CATEGORY_HAS_CHILDREN: &str = "Không thể xóa danh mục đang chứa danh mục con";
pub const CATEGORY_IN_USE: &str = "Không thể xóa danh mục đang có sản phẩm";
pub const CATEGORY_PARENT_INVALID: &str = "Danh mục cha không hợp lệ";

// Stock / cart
pub const OUT_OF_STOCK: &str = "Sản phẩm đã hết hàng";
pub const INSUFFICIENT_STOCK: &str = "Số lượng trong kho không đủ";
pub const QUANTITY_INVALID: &str = "Số lượng không hợp lệ";
pub const PRICE_CHANGED: &str = "Giá sản phẩm đã thay đổi";

// PC builder
pub const COMPONENT_KIND_MISSING: &str = "Sản phẩm không phải linh kiện lắp ráp";

// Orders
pub const ORDER_NOT_FOUND: &str = "Không tìm thấy đơn hàng";
pub const ORDER_EMPTY: &str = "Đơn hàng phải có ít nhất một sản phẩm";
pub const ORDER_CONTACT_REQUIRED: &str = "Vui lòng điền đầy đủ thông tin người nhận";
pub const ORDER_STATUS_INVALID: &str = "Không thể chuyển đơn hàng sang trạng thái này";

// Notifications
pub const NOTIFICATION_NOT_FOUND: &str = "Không tìm thấy thông báo";

#[cfg(test)]
mod tests {
    #[test]
    fn catalog_has_no_blank_messages() {
        let all = [
            super::INTERNAL,
            super::DB_UNAVAILABLE,
            super::NOT_FOUND,
            super::VALIDATION,
            super::LOGIN_REQUIRED,
            super::SESSION_EXPIRED,
            super::FORBIDDEN,
            super::INVALID_CREDENTIALS,
            super::ACCOUNT_LOCKED,
            super::EMAIL_TAKEN,
            super::EMAIL_INVALID,
            super::PASSWORD_TOO_SHORT,
            super::PASSWORD_MISMATCH,
            super::PRODUCT_NOT_FOUND,
            super::PRODUCT_CODE_TAKEN,
            super::PRODUCT_DISCONTINUED,
            super::PRICE_NOT_POSITIVE,
            super::SLUG_TAKEN,
            super::BRAND_NOT_FOUND,
            super::BRAND_IN_USE,
            super::CATEGORY_NOT_FOUND,
            super::CATEGORY_HAS_CHILDREN,
            super::CATEGORY_IN_USE,
            super::CATEGORY_PARENT_INVALID,
            super::OUT_OF_STOCK,
            super::INSUFFICIENT_STOCK,
            super::QUANTITY_INVALID,
            super::PRICE_CHANGED,
            super::COMPONENT_KIND_MISSING,
            super::ORDER_NOT_FOUND,
            super::ORDER_EMPTY,
            super::ORDER_CONTACT_REQUIRED,
            super::ORDER_STATUS_INVALID,
            super::NOTIFICATION_NOT_FOUND,
        ];
        for message in all {
            assert!(!message.trim().is_empty());
        }
    }
}
