//! Cart service
//!
//! Every request resolves its working cart through [`CartService::resolve_or_create`]
//! before touching items; the function is idempotent and cheap enough to run
//! on plain page views. Mutations return the refreshed [`CartContext`] so the
//! HTTP layer can re-issue the session cookie.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use arbor_db::{
    CartItemRow, CartRepository, CartRow, DbError, ProductRepository, ProductRow, UpsertCartItem,
};
use arbor_types::{CartContext, CartId, CartItemId, ProductId, UserId};

use crate::CartError;

/// Cart engine over cart and product repositories
#[derive(Clone)]
pub struct CartService<C: CartRepository, P: ProductRepository> {
    carts: Arc<C>,
    products: Arc<P>,
}

/// Outcome of cart resolution
#[derive(Debug, Clone)]
pub struct ResolvedCart {
    /// The working cart for this request
    pub cart: CartRow,
    /// Total item quantity (0 when empty)
    pub item_count: i64,
    /// An anonymous session cart was merged into the user's cart
    pub merged: bool,
    /// An anonymous session cart was adopted by the user
    pub adopted: bool,
    /// Refreshed session slot
    pub context: CartContext,
}

/// Outcome of adding an item
#[derive(Debug, Clone)]
pub struct AddedItem {
    pub product_name: String,
    pub item_count: i64,
    pub context: CartContext,
}

/// Outcome of removing an item
#[derive(Debug, Clone)]
pub struct RemovedItem {
    pub item_count: i64,
    pub cart_total: Decimal,
    pub context: CartContext,
}

/// Outcome of a quantity update
#[derive(Debug, Clone)]
pub struct UpdatedItem {
    /// The item was deleted because quantity reached zero
    pub removed: bool,
    pub product_name: String,
    pub new_quantity: i64,
    /// Exact line total (zero when removed)
    pub item_total: Decimal,
    pub item_count: i64,
    pub cart_total: Decimal,
    pub context: CartContext,
}

/// One cart line joined with its product
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: CartItemRow,
    pub product: ProductRow,
}

/// Read-model of a cart for display
#[derive(Debug, Clone)]
pub struct CartView {
    pub cart: CartRow,
    pub lines: Vec<CartLine>,
    pub item_count: i64,
    /// Exact total: sum of quantity x stored price
    pub total: Decimal,
    pub context: CartContext,
}

impl<C: CartRepository, P: ProductRepository> CartService<C, P> {
    /// Create a new cart service
    pub fn new(carts: Arc<C>, products: Arc<P>) -> Self {
        Self { carts, products }
    }

    /// Resolve the working cart for this request, creating one if needed.
    ///
    /// Authenticated callers get their owned cart; a different, ownerless
    /// cart referenced by the session is merged into it and deleted. A user
    /// with no cart adopts the session's ownerless cart when one exists.
    /// Anonymous callers reuse the session cart only while it is still
    /// ownerless.
    pub async fn resolve_or_create(
        &self,
        ctx: CartContext,
        user: Option<UserId>,
    ) -> Result<ResolvedCart, CartError> {
        let mut merged = false;
        let mut adopted = false;

        let cart = match user {
            Some(user_id) => {
                if let Some(cart) = self.carts.find_by_user(user_id.0).await? {
                    if let Some(session_cart) = ctx.cart_id {
                        if session_cart.0 != cart.id {
                            if let Some(anon) = self.carts.find_anonymous(session_cart.0).await? {
                                self.carts.merge_into(anon.id, cart.id).await?;
                                merged = true;
                                tracing::info!(
                                    user_id = %user_id,
                                    cart_id = %cart.id,
                                    "merged anonymous cart into account cart"
                                );
                            }
                        }
                    }
                    cart
                } else if let Some(anon) = self.session_anonymous_cart(&ctx).await? {
                    match self.carts.assign_user(anon.id, user_id.0).await {
                        Ok(()) => {
                            adopted = true;
                            tracing::info!(user_id = %user_id, cart_id = %anon.id, "adopted anonymous cart");
                            self.carts
                                .find_by_id(anon.id)
                                .await?
                                .ok_or(CartError::NotFound("cart"))?
                        }
                        // Lost the race for the ownerless cart; start fresh.
                        Err(DbError::NotFound) => self.carts.create(Some(user_id.0)).await?,
                        Err(e) => return Err(e.into()),
                    }
                } else {
                    self.carts.create(Some(user_id.0)).await?
                }
            }
            None => match self.session_anonymous_cart(&ctx).await? {
                Some(cart) => cart,
                None => self.carts.create(None).await?,
            },
        };

        let item_count = self.carts.item_count(cart.id).await?;
        let context = CartContext::with_cart(CartId(cart.id), item_count);

        Ok(ResolvedCart {
            cart,
            item_count,
            merged,
            adopted,
            context,
        })
    }

    /// Add a product to the caller's cart, snapshotting the effective unit
    /// price (sale price while the product is on sale, list price
    /// otherwise). Re-adding a product increments its quantity and keeps
    /// the originally stored price.
    ///
    /// Guests cannot accumulate a cart through this path; callers without a
    /// user are turned away to log in first.
    pub async fn add_item(
        &self,
        ctx: CartContext,
        user: Option<UserId>,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<AddedItem, CartError> {
        let user = user.ok_or(CartError::LoginRequired)?;

        let quantity: i32 = i32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or_else(|| CartError::Validation("Quantity must be a positive integer.".to_string()))?;

        let product = self
            .products
            .find_by_id(product_id.0)
            .await?
            .ok_or(CartError::NotFound("product"))?;

        let resolved = self.resolve_or_create(ctx, Some(user)).await?;

        self.carts
            .upsert_item(UpsertCartItem {
                id: Uuid::new_v4(),
                cart_id: resolved.cart.id,
                product_id: product.id,
                quantity,
                price: product.discounted_price(),
            })
            .await?;

        let item_count = self.carts.item_count(resolved.cart.id).await?;
        let context = CartContext::with_cart(CartId(resolved.cart.id), item_count);

        tracing::debug!(product_id = %product.id, cart_id = %resolved.cart.id, "item added to cart");

        Ok(AddedItem {
            product_name: product.name,
            item_count,
            context,
        })
    }

    /// Remove a cart item by id and report the caller's refreshed totals.
    ///
    /// TODO: there is no check that the item belongs to the caller's cart;
    /// any caller who knows an item id can delete it. Kept to match the
    /// current storefront behavior; tightening it changes the contract.
    pub async fn remove_item(
        &self,
        ctx: CartContext,
        user: Option<UserId>,
        item_id: CartItemId,
    ) -> Result<RemovedItem, CartError> {
        match self.carts.delete_item(item_id.0).await {
            Ok(()) => {}
            Err(DbError::NotFound) => return Err(CartError::NotFound("cart item")),
            Err(e) => return Err(e.into()),
        }

        let resolved = self.resolve_or_create(ctx, user).await?;
        let cart_total = self.carts.total_price(resolved.cart.id).await?;

        Ok(RemovedItem {
            item_count: resolved.item_count,
            cart_total,
            context: resolved.context,
        })
    }

    /// Set a cart item's quantity from a client-supplied value.
    ///
    /// Validation order matters and is part of the contract: ownership of
    /// the resolved cart first (unauthorized), then missing/non-integer
    /// input, then negative values; zero deletes the item.
    pub async fn update_quantity(
        &self,
        ctx: CartContext,
        user: Option<UserId>,
        item_id: CartItemId,
        quantity: Option<i64>,
    ) -> Result<UpdatedItem, CartError> {
        let user = user.ok_or(CartError::LoginRequired)?;

        let item = self
            .carts
            .find_item(item_id.0)
            .await?
            .ok_or(CartError::NotFound("cart item"))?;

        let resolved = self.resolve_or_create(ctx, Some(user)).await?;

        if item.cart_id != resolved.cart.id {
            return Err(CartError::Unauthorized);
        }

        let quantity = quantity
            .ok_or_else(|| CartError::Validation("Invalid quantity provided.".to_string()))?;
        if quantity < 0 {
            return Err(CartError::Validation(
                "Quantity cannot be negative.".to_string(),
            ));
        }

        let product = self
            .products
            .find_by_id(item.product_id)
            .await?
            .ok_or(CartError::NotFound("product"))?;

        let (removed, item_total) = if quantity == 0 {
            self.carts.delete_item(item.id).await?;
            (true, Decimal::ZERO)
        } else {
            let quantity: i32 = i32::try_from(quantity)
                .map_err(|_| CartError::Validation("Invalid quantity provided.".to_string()))?;
            let updated = self.carts.update_item_quantity(item.id, quantity).await?;
            (false, updated.line_total())
        };

        let item_count = self.carts.item_count(resolved.cart.id).await?;
        let cart_total = self.carts.total_price(resolved.cart.id).await?;
        let context = CartContext::with_cart(CartId(resolved.cart.id), item_count);

        Ok(UpdatedItem {
            removed,
            product_name: product.name,
            new_quantity: quantity,
            item_total,
            item_count,
            cart_total,
            context,
        })
    }

    /// Cart read-model: lines joined with products, count, exact total
    pub async fn view(
        &self,
        ctx: CartContext,
        user: Option<UserId>,
    ) -> Result<CartView, CartError> {
        let resolved = self.resolve_or_create(ctx, user).await?;
        let items = self.carts.items(resolved.cart.id).await?;

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = self.products.find_many(&product_ids).await?;

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .cloned()
                .ok_or(CartError::NotFound("product"))?;
            lines.push(CartLine { item, product });
        }

        let total: Decimal = lines.iter().map(|l| l.item.line_total()).sum();

        Ok(CartView {
            cart: resolved.cart,
            item_count: resolved.item_count,
            total,
            context: resolved.context,
            lines,
        })
    }

    async fn session_anonymous_cart(&self, ctx: &CartContext) -> Result<Option<CartRow>, CartError> {
        match ctx.cart_id {
            Some(cart_id) => Ok(self.carts.find_anonymous(cart_id.0).await?),
            None => Ok(None),
        }
    }
}
