//! GraphQL documents sent to the Admin API.

/// Fetches the first page of code discounts with enough applicability
/// detail to filter them per product.
///
/// `__typename` selections drive the serde tagged-union deserialization
/// in [`crate::shopify::types`].
pub const DISCOUNT_QUERY: &str = r"
query GetDiscounts {
  codeDiscountNodes(first: 50) {
    edges {
      node {
        id
        codeDiscount {
          __typename
          ... on DiscountCodeBasic {
            title
            status
            codes(first: 50) {
              edges {
                node {
                  code
                }
              }
            }
            startsAt
            endsAt
            customerGets {
              items {
                __typename
                ... on DiscountProducts {
                  products(first: 250) {
                    edges {
                      node {
                        id
                        title
                      }
                    }
                  }
                }
                ... on DiscountCollections {
                  collections(first: 50) {
                    edges {
                      node {
                        id
                        title
                      }
                    }
                  }
                }
                ... on AllDiscountItems {
                  allItems
                }
              }
            }
            usageLimit
            asyncUsageCount
          }
          ... on DiscountCodeBxgy {
            title
            status
            codes(first: 50) {
              edges {
                node {
                  code
                }
              }
            }
            startsAt
            endsAt
            customerBuys {
              items {
                __typename
                ... on DiscountProducts {
                  products(first: 250) {
                    edges {
                      node {
                        id
                        title
                      }
                    }
                  }
                }
                ... on DiscountCollections {
                  collections(first: 50) {
                    edges {
                      node {
                        id
                        title
                      }
                    }
                  }
                }
                ... on AllDiscountItems {
                  allItems
                }
              }
            }
            customerGets {
              items {
                __typename
                ... on DiscountProducts {
                  products(first: 250) {
                    edges {
                      node {
                        id
                        title
                      }
                    }
                  }
                }
                ... on AllDiscountItems {
                  allItems
                }
              }
            }
            usageLimit
            asyncUsageCount
          }
          ... on DiscountCodeFreeShipping {
            title
            status
            codes(first: 50) {
              edges {
                node {
                  code
                }
              }
            }
            startsAt
            endsAt
            usageLimit
            asyncUsageCount
          }
        }
      }
    }
  }
}
";
